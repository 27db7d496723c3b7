//! Turn controller scenarios against a scripted oracle.

use oracle_chess::{
    BoardUpdate, ChannelBoard, Color, GameOutcome, HttpOracle, InputRejected, LocalOracle, Move,
    MoveError, OracleClient, OracleError, OracleResponse, Square, TurnController, TurnState,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Oracle that replays canned replies and records every history it is sent.
#[derive(Default)]
struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<Move, OracleError>>>,
    requests: Mutex<Vec<Vec<String>>>,
}

impl ScriptedOracle {
    fn new(replies: Vec<Result<Move, OracleError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl OracleClient for ScriptedOracle {
    async fn request_move(&self, history: &[String]) -> Result<Move, OracleError> {
        self.requests.lock().unwrap().push(history.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(OracleError::Unreachable("script exhausted".to_string())))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

fn mv(s: &str) -> Move {
    s.parse().unwrap()
}

fn drain(rx: &mut UnboundedReceiver<BoardUpdate>) -> Vec<BoardUpdate> {
    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    updates
}

fn errors(updates: &[BoardUpdate]) -> Vec<String> {
    updates
        .iter()
        .filter_map(|u| match u {
            BoardUpdate::Error(message) => Some(message.clone()),
            _ => None,
        })
        .collect()
}

fn started(
    oracle: Arc<ScriptedOracle>,
    human: Color,
) -> (
    TurnController<ChannelBoard>,
    UnboundedReceiver<BoardUpdate>,
) {
    let (board, rx) = ChannelBoard::channel();
    let mut controller = TurnController::new(board, oracle, human);
    controller.start();
    (controller, rx)
}

#[tokio::test]
async fn test_human_move_hands_turn_to_oracle() {
    let oracle = ScriptedOracle::new(vec![Ok(mv("e7e5"))]);
    let (mut controller, mut rx) = started(oracle.clone(), Color::White);

    let e2 = controller.destinations().destinations(sq("e2")).unwrap();
    assert!(e2.contains(&sq("e4")));
    assert!(e2.contains(&sq("e3")));
    assert_eq!(controller.state(), TurnState::WaitingForHuman);

    controller.submit_human_move(sq("e2"), sq("e4")).unwrap();

    assert_eq!(controller.store().side_to_move(), Color::Black);
    assert_eq!(controller.state(), TurnState::AwaitingOracle);
    let updates = drain(&mut rx);
    assert!(updates.contains(&BoardUpdate::Turn(Color::Black)));
    assert!(updates.contains(&BoardUpdate::AwaitingOracle(true)));
    assert!(updates.contains(&BoardUpdate::LastMove {
        origin: sq("e2"),
        destination: sq("e4"),
    }));
}

#[tokio::test]
async fn test_oracle_reply_is_applied() {
    let oracle = ScriptedOracle::new(vec![Ok(mv("e7e5"))]);
    let (mut controller, mut rx) = started(oracle.clone(), Color::White);

    controller.submit_human_move(sq("e2"), sq("e4")).unwrap();
    drain(&mut rx);
    assert!(controller.step().await.is_continue());

    assert_eq!(controller.state(), TurnState::WaitingForHuman);
    assert_eq!(controller.store().side_to_move(), Color::White);
    assert_eq!(controller.store().outcome(), GameOutcome::InProgress);
    assert_eq!(
        controller.store().history_as_coordinate_pairs(),
        vec!["e2e4", "e7e5"]
    );
    assert_eq!(oracle.requests(), vec![vec!["e2e4".to_string()]]);

    let updates = drain(&mut rx);
    assert!(updates.contains(&BoardUpdate::AwaitingOracle(false)));
    assert!(updates.contains(&BoardUpdate::LastMove {
        origin: sq("e7"),
        destination: sq("e5"),
    }));
    assert!(errors(&updates).is_empty());
}

#[tokio::test]
async fn test_empty_oracle_reply_leaves_position_unchanged() {
    let oracle = ScriptedOracle::new(vec![OracleResponse::default().into_move()]);
    let (mut controller, mut rx) = started(oracle, Color::White);

    controller.submit_human_move(sq("e2"), sq("e4")).unwrap();
    let before = controller.store().serialized_position();
    drain(&mut rx);
    assert!(controller.step().await.is_continue());

    assert_eq!(controller.state(), TurnState::WaitingForHuman);
    assert_eq!(controller.store().serialized_position(), before);
    assert_eq!(controller.store().history_as_coordinate_pairs(), vec!["e2e4"]);

    let messages = errors(&drain(&mut rx));
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Malformed oracle response"));
}

#[tokio::test]
async fn test_oracle_checkmate_ends_game() {
    let oracle = ScriptedOracle::new(vec![Ok(mv("e7e5")), Ok(mv("d8h4"))]);
    let (mut controller, mut rx) = started(oracle, Color::White);

    controller.submit_human_move(sq("f2"), sq("f3")).unwrap();
    assert!(controller.step().await.is_continue());
    controller.submit_human_move(sq("g2"), sq("g4")).unwrap();
    assert!(controller.step().await.is_continue());

    assert_eq!(controller.state(), TurnState::GameOver);
    assert_eq!(controller.store().outcome(), GameOutcome::Win(Color::Black));
    assert!(drain(&mut rx).contains(&BoardUpdate::GameOver(GameOutcome::Win(Color::Black))));

    assert_eq!(
        controller.submit_human_move(sq("a2"), sq("a3")),
        Err(InputRejected::GameOver)
    );
    assert_eq!(controller.store().history().len(), 4);
}

#[tokio::test]
async fn test_human_checkmate_skips_oracle() {
    let oracle = ScriptedOracle::new(vec![Ok(mv("e7e5")), Ok(mv("b8c6")), Ok(mv("g8f6"))]);
    let (mut controller, _rx) = started(oracle.clone(), Color::White);

    for (origin, destination) in [("e2", "e4"), ("f1", "c4"), ("d1", "h5")] {
        controller
            .submit_human_move(sq(origin), sq(destination))
            .unwrap();
        assert!(controller.step().await.is_continue());
    }
    controller.submit_human_move(sq("h5"), sq("f7")).unwrap();

    assert_eq!(controller.state(), TurnState::GameOver);
    assert_eq!(controller.store().outcome(), GameOutcome::Win(Color::White));
    assert_eq!(oracle.requests().len(), 3);
}

#[tokio::test]
async fn test_illegal_human_move_has_no_visible_effect() {
    let oracle = ScriptedOracle::new(vec![]);
    let (mut controller, mut rx) = started(oracle.clone(), Color::White);
    drain(&mut rx);

    let result = controller.submit_human_move(sq("e2"), sq("e5"));

    assert!(matches!(
        result,
        Err(InputRejected::Illegal(MoveError::IllegalMove(_)))
    ));
    assert_eq!(controller.state(), TurnState::WaitingForHuman);
    assert!(controller.store().history().is_empty());
    assert!(drain(&mut rx).is_empty());
    assert!(oracle.requests().is_empty());
}

#[tokio::test]
async fn test_move_rejected_while_awaiting_oracle() {
    let oracle = ScriptedOracle::new(vec![Ok(mv("e7e5"))]);
    let (mut controller, _rx) = started(oracle, Color::White);

    controller.submit_human_move(sq("e2"), sq("e4")).unwrap();
    assert_eq!(
        controller.submit_human_move(sq("d2"), sq("d4")),
        Err(InputRejected::AwaitingOracle)
    );
    assert_eq!(controller.store().history().len(), 1);
}

#[tokio::test]
async fn test_stale_reply_discarded_after_new_game() {
    let oracle = ScriptedOracle::new(vec![Ok(mv("e7e5"))]);
    let (mut controller, _rx) = started(oracle, Color::White);

    controller.submit_human_move(sq("e2"), sq("e4")).unwrap();
    controller.new_game();
    assert_eq!(controller.generation(), 1);
    assert!(controller.store().history().is_empty());

    // The reply to the abandoned request still arrives
    assert!(controller.step().await.is_continue());

    assert_eq!(controller.state(), TurnState::WaitingForHuman);
    assert!(controller.store().history().is_empty());
    assert_eq!(controller.store().side_to_move(), Color::White);
}

#[tokio::test]
async fn test_move_event_retries_failed_oracle_turn() {
    let oracle = ScriptedOracle::new(vec![
        Err(OracleError::Unreachable("connection refused".to_string())),
        Ok(mv("e7e5")),
    ]);
    let (mut controller, mut rx) = started(oracle.clone(), Color::White);

    controller.submit_human_move(sq("e2"), sq("e4")).unwrap();
    assert!(controller.step().await.is_continue());
    assert_eq!(controller.state(), TurnState::WaitingForHuman);
    assert_eq!(controller.store().side_to_move(), Color::Black);
    assert!(errors(&drain(&mut rx))[0].starts_with("Could not reach the oracle"));

    assert_eq!(
        controller.submit_human_move(sq("d2"), sq("d4")),
        Err(InputRejected::OracleToMove)
    );
    assert_eq!(controller.state(), TurnState::AwaitingOracle);
    assert!(controller.step().await.is_continue());

    assert_eq!(
        controller.store().history_as_coordinate_pairs(),
        vec!["e2e4", "e7e5"]
    );
    assert_eq!(oracle.requests().len(), 2);
}

#[tokio::test]
async fn test_retry_input_reissues_request() {
    let oracle = ScriptedOracle::new(vec![
        Err(OracleError::Unreachable("timed out".to_string())),
        Ok(mv("c7c5")),
    ]);
    let (mut controller, _rx) = started(oracle, Color::White);

    assert_eq!(controller.retry_oracle(), Err(InputRejected::NothingToRetry));

    controller.submit_human_move(sq("e2"), sq("e4")).unwrap();
    assert!(controller.step().await.is_continue());
    let handle = controller.handle();
    handle.retry_oracle().unwrap();
    assert!(controller.step().await.is_continue()); // RetryOracle
    assert!(controller.step().await.is_continue()); // OracleReply

    assert_eq!(controller.store().last_move(), Some(mv("c7c5")));
    assert_eq!(controller.state(), TurnState::WaitingForHuman);
}

#[tokio::test]
async fn test_illegal_oracle_move_is_reported() {
    let oracle = ScriptedOracle::new(vec![Ok(mv("e7e4"))]);
    let (mut controller, mut rx) = started(oracle, Color::White);

    controller.submit_human_move(sq("e2"), sq("e4")).unwrap();
    let before = controller.store().serialized_position();
    drain(&mut rx);
    assert!(controller.step().await.is_continue());

    assert_eq!(controller.store().serialized_position(), before);
    assert_eq!(controller.state(), TurnState::WaitingForHuman);
    assert_eq!(
        errors(&drain(&mut rx)),
        vec![OracleError::IllegalMoveProposed(mv("e7e4")).to_string()]
    );
}

#[tokio::test]
async fn test_oracle_opens_when_human_plays_black() {
    let oracle = ScriptedOracle::new(vec![Ok(mv("d2d4"))]);
    let (mut controller, _rx) = started(oracle.clone(), Color::Black);

    assert_eq!(controller.state(), TurnState::AwaitingOracle);
    assert!(controller.step().await.is_continue());

    assert_eq!(controller.store().side_to_move(), Color::Black);
    assert_eq!(controller.state(), TurnState::WaitingForHuman);
    assert_eq!(oracle.requests(), vec![Vec::<String>::new()]);
}

#[tokio::test]
async fn test_handle_inputs_and_shutdown() {
    let oracle = ScriptedOracle::new(vec![Ok(mv("e7e5"))]);
    let (mut controller, _rx) = started(oracle, Color::White);
    let handle = controller.handle();

    handle.human_move(sq("g1"), sq("f3")).unwrap();
    assert!(controller.step().await.is_continue());
    assert_eq!(controller.state(), TurnState::AwaitingOracle);
    assert!(controller.step().await.is_continue());

    handle.shutdown().unwrap();
    assert!(controller.step().await.is_break());
}

#[tokio::test]
async fn test_plays_against_local_oracle_over_http() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(LocalOracle::default().serve(listener));

    let oracle =
        HttpOracle::new(format!("http://{}", addr), Some(Duration::from_secs(5))).unwrap();
    let (board, _rx) = ChannelBoard::channel();
    let mut controller = TurnController::new(board, Arc::new(oracle), Color::White);
    controller.start();

    controller.submit_human_move(sq("e2"), sq("e4")).unwrap();
    assert!(controller.step().await.is_continue());

    assert_eq!(controller.state(), TurnState::WaitingForHuman);
    assert_eq!(
        controller.store().history_as_coordinate_pairs(),
        vec!["e2e4", "a7a5"]
    );
}
