use ertask::core::Atom;
use ertask::core::Exit;
use ertask::task::Accept;
use ertask::task::Lifecycle;
use ertask::task::TaskState;
use loom::sync::Arc;
use loom::thread;

fn atom(name: &'static str) -> Exit {
  Exit::from(Atom::new(name))
}

#[test]
fn concurrent_accept_has_one_winner() {
  loom::model(|| {
    let state: Arc<Lifecycle> = Arc::new(Lifecycle::new());
    state.start();

    let threads: Vec<_> = ["first", "second"]
      .into_iter()
      .map(|name| {
        let state: Arc<Lifecycle> = Arc::clone(&state);
        thread::spawn(move || (name, state.accept(atom(name))))
      })
      .collect();

    let results: Vec<(&str, Accept)> = threads.into_iter().map(|handle| handle.join().unwrap()).collect();

    let winners: Vec<&str> = results
      .iter()
      .filter(|(_, result)| *result == Accept::Accepted)
      .map(|(name, _)| *name)
      .collect();

    assert_eq!(winners.len(), 1, "exactly one accept must win");
    assert_eq!(state.state(), TaskState::ExitSig);
    assert_eq!(state.pending(), Some(atom(winners[0])));
  });
}

#[test]
fn accept_racing_finish() {
  loom::model(|| {
    let state: Arc<Lifecycle> = Arc::new(Lifecycle::new());
    state.start();

    let signal = {
      let state: Arc<Lifecycle> = Arc::clone(&state);
      thread::spawn(move || state.accept(atom("signal")))
    };

    let finish: Option<Exit> = state.finish(Exit::NORMAL);
    let accept: Accept = signal.join().unwrap();

    match accept {
      Accept::Accepted => assert_eq!(finish, Some(atom("signal"))),
      Accept::Done => assert_eq!(finish, Some(Exit::NORMAL)),
      Accept::Pending => panic!("no other signal was sent"),
    }

    assert_eq!(state.state(), TaskState::Done);
  });
}
