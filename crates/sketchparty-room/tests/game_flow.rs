//! Integration tests for the room state machine.
//!
//! Every test runs with `start_paused = true`: Tokio's clock only advances
//! while all tasks are blocked on timers, so the 10/20/60 second phase
//! countdowns and the 60 second rejoin grace window play out instantly and
//! deterministically. Player connections are plain unbounded channels — the
//! same shape the transport layer hands the room core in production.

use std::time::Duration;

use sketchparty_protocol::{
    ChatMessage, DrawData, GameMessage, Phase, MOTION_EVENT_FINISHED,
    MOTION_EVENT_ONGOING,
};
use sketchparty_room::{
    GameConfig, PlayerConnection, RoomDirectory, RoomError, RoomHandle,
};
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

type Inbox = mpsc::UnboundedReceiver<GameMessage>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn connection() -> (PlayerConnection, Inbox) {
    mpsc::unbounded_channel()
}

fn chat(from: &str, text: &str) -> ChatMessage {
    ChatMessage {
        from: from.to_string(),
        room_name: "lounge".to_string(),
        message: text.to_string(),
        timestamp: 0,
    }
}

fn stroke(motion_event: i32) -> DrawData {
    DrawData {
        room_name: "lounge".to_string(),
        color: 0xFF0000,
        thickness: 8.0,
        from_x: 10.0,
        from_y: 10.0,
        to_x: 42.0,
        to_y: 42.0,
        motion_event,
    }
}

async fn wait_for_phase(room: &RoomHandle, phase: Phase) {
    for _ in 0..1_000 {
        if room.info().await.expect("room alive").phase == phase {
            return;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    panic!("room never reached {phase}");
}

/// Lets the actor drain its mailbox, then empties the inbox.
async fn drain(inbox: &mut Inbox) -> Vec<GameMessage> {
    tokio::time::sleep(Duration::from_millis(1)).await;
    let mut msgs = Vec::new();
    while let Ok(msg) = inbox.try_recv() {
        msgs.push(msg);
    }
    msgs
}

fn score_of(room_info: &sketchparty_room::RoomInfo, username: &str) -> i32 {
    room_info
        .players
        .iter()
        .find(|p| p.username == username)
        .unwrap_or_else(|| panic!("{username} not in roster"))
        .score
}

/// Creates a room, seats the given players, and returns their inboxes in
/// order.
async fn room_with_players(
    dir: &RoomDirectory,
    max_players: usize,
    players: &[(&str, &str)],
) -> (RoomHandle, Vec<Inbox>) {
    let room = dir
        .create_room("lounge", max_players, GameConfig::default())
        .expect("create room");
    let mut inboxes = Vec::new();
    for (client_id, username) in players {
        let (conn, inbox) = connection();
        dir.join_room("lounge", client_id, username, conn)
            .await
            .expect("join");
        inboxes.push(inbox);
    }
    (room, inboxes)
}

/// Drives a freshly created room into GAME_RUNNING with a known word.
/// Returns the drawing player's username.
async fn start_round(
    dir: &RoomDirectory,
    room: &RoomHandle,
    word: &str,
) -> String {
    wait_for_phase(room, Phase::NewRound).await;
    dir.submit_chosen_word("lounge", word).await.expect("choose");
    wait_for_phase(room, Phase::GameRunning).await;
    room.info()
        .await
        .expect("room alive")
        .drawing_player
        .expect("a drawing player is assigned")
}

// =========================================================================
// Lobby & phase triggers
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_single_player_waits_for_players() {
    let dir = RoomDirectory::new();
    let (room, mut inboxes) =
        room_with_players(&dir, 4, &[("c-ada", "ada")]).await;

    let info = room.info().await.unwrap();
    assert_eq!(info.phase, Phase::WaitingForPlayers);
    assert_eq!(info.player_count(), 1);

    // The lobby notice goes out without arming a countdown.
    let msgs = drain(&mut inboxes[0]).await;
    assert!(msgs.iter().any(|m| matches!(
        m,
        GameMessage::PhaseChange(pc) if pc.phase == Some(Phase::WaitingForPlayers)
    )));
}

#[tokio::test(start_paused = true)]
async fn test_second_player_starts_the_pregame_countdown() {
    let dir = RoomDirectory::new();
    let (room, mut inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;

    assert_eq!(room.info().await.unwrap().phase, Phase::WaitingForStart);

    // First countdown tick names the phase and carries the full delay.
    let msgs = drain(&mut inboxes[1]).await;
    assert!(msgs.iter().any(|m| matches!(
        m,
        GameMessage::PhaseChange(pc)
            if pc.phase == Some(Phase::WaitingForStart) && pc.time_ms == 10_000
    )));

    // Later ticks drop the phase name and count down.
    tokio::time::sleep(Duration::from_millis(1_200)).await;
    let msgs = drain(&mut inboxes[1]).await;
    assert!(msgs.iter().any(|m| matches!(
        m,
        GameMessage::PhaseChange(pc)
            if pc.phase.is_none() && pc.time_ms == 9_000
    )));
}

#[tokio::test(start_paused = true)]
async fn test_full_roster_skips_straight_to_new_round() {
    init_tracing();
    let dir = RoomDirectory::new();
    let (room, _inboxes) = room_with_players(
        &dir,
        4,
        &[
            ("c-ada", "ada"),
            ("c-bella", "bella"),
            ("c-cora", "cora"),
            ("c-dmitri", "dmitri"),
        ],
    )
    .await;

    // Capacity reached during WAITING_FOR_START forces the round to begin
    // without waiting out the 10s timer.
    let info = room.info().await.unwrap();
    assert_eq!(info.phase, Phase::NewRound);
    assert!(info.drawing_player.is_some());
    assert_eq!(
        info.players.iter().filter(|p| p.is_drawing).count(),
        1,
        "exactly one drawing player"
    );
}

#[tokio::test(start_paused = true)]
async fn test_pregame_countdown_reaches_new_round_on_its_own() {
    let dir = RoomDirectory::new();
    let (room, _inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;

    wait_for_phase(&room, Phase::NewRound).await;
    let info = room.info().await.unwrap();
    assert!(info.drawing_player.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_roster_drop_cancels_pending_transition() {
    let dir = RoomDirectory::new();
    let (room, _inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;
    assert_eq!(room.info().await.unwrap().phase, Phase::WaitingForStart);

    // Dropping to one player parks the room and must void the armed 10s
    // transition to NEW_ROUND.
    dir.player_disconnected("lounge", "c-bella").await.unwrap();
    wait_for_phase(&room, Phase::WaitingForPlayers).await;

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(
        room.info().await.unwrap().phase,
        Phase::WaitingForPlayers,
        "cancelled countdown must not fire its transition"
    );
}

// =========================================================================
// Word flow
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_drawer_gets_candidates_and_guessers_get_the_mask() {
    init_tracing();
    let dir = RoomDirectory::new();
    let (room, mut inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;

    wait_for_phase(&room, Phase::NewRound).await;
    let drawer = room.info().await.unwrap().drawing_player.unwrap();

    // Only the drawing player is offered candidate words.
    let usernames = ["ada", "bella"];
    let mut all_msgs = Vec::new();
    for inbox in inboxes.iter_mut() {
        all_msgs.push(drain(inbox).await);
    }
    for (name, msgs) in usernames.iter().zip(&all_msgs) {
        let got_candidates = msgs
            .iter()
            .any(|m| matches!(m, GameMessage::NewWords(w) if w.new_words.len() == 3));
        assert_eq!(
            got_candidates,
            *name == drawer,
            "candidate words went to the wrong player"
        );
    }

    // Nobody picks; the fallback word starts the round anyway.
    wait_for_phase(&room, Phase::GameRunning).await;

    for (name, inbox) in usernames.iter().zip(inboxes.iter_mut()) {
        let msgs = drain(inbox).await;
        let state = msgs.iter().rev().find_map(|m| match m {
            GameMessage::GameState(gs) => Some(gs.clone()),
            _ => None,
        });
        let state = state.expect("every player gets a game state");
        assert_eq!(state.drawing_player, drawer);
        if *name == drawer {
            assert!(
                !state.word.contains('_'),
                "drawer must see the word itself"
            );
        } else {
            assert!(
                state.word.contains('_'),
                "guessers must only see the mask"
            );
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_chosen_word_starts_the_round_immediately() {
    let dir = RoomDirectory::new();
    let (room, _inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;

    wait_for_phase(&room, Phase::NewRound).await;
    dir.submit_chosen_word("lounge", "apple").await.unwrap();

    // No timer wait: the pick itself drives the transition.
    assert_eq!(room.info().await.unwrap().phase, Phase::GameRunning);
}

#[tokio::test(start_paused = true)]
async fn test_chosen_word_outside_round_setup_is_ignored() {
    let dir = RoomDirectory::new();
    let (room, _inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;
    let _drawer = start_round(&dir, &room, "apple").await;

    // A second pick mid-round must not restart the phase.
    dir.submit_chosen_word("lounge", "rocket").await.unwrap();
    assert_eq!(room.info().await.unwrap().phase, Phase::GameRunning);

    let correct = dir.submit_guess("lounge", chat("bella", "apple")).await;
    let correct = correct.unwrap()
        || dir
            .submit_guess("lounge", chat("ada", "apple"))
            .await
            .unwrap();
    assert!(correct, "the original word must still be the secret");
}

// =========================================================================
// Guessing & scoring
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_correct_guess_scores_and_round_ends_when_all_guessed() {
    init_tracing();
    let dir = RoomDirectory::new();
    let (room, _inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella"), ("c-cora", "cora")],
    )
    .await;
    let drawer = start_round(&dir, &room, "apple").await;

    let mut guessers = vec!["ada", "bella", "cora"];
    guessers.retain(|name| *name != drawer);

    // Case-insensitive, whitespace-trimmed exact match. No virtual time
    // has passed since the round started, so the full time bonus applies.
    let first = guessers[0];
    assert!(dir
        .submit_guess("lounge", chat(first, "  Apple "))
        .await
        .unwrap());

    let info = room.info().await.unwrap();
    assert_eq!(score_of(&info, first), 100);
    // Drawer's cut: 50 split over 3 players, integer division.
    assert_eq!(score_of(&info, &drawer), 16);
    assert_eq!(info.phase, Phase::GameRunning, "one guesser still missing");

    // Double-scoring the same winner is impossible.
    assert!(!dir
        .submit_guess("lounge", chat(first, "apple"))
        .await
        .unwrap());
    assert_eq!(score_of(&room.info().await.unwrap(), first), 100);

    // The last guesser short-circuits the 60s timer.
    let second = guessers[1];
    assert!(dir
        .submit_guess("lounge", chat(second, "APPLE"))
        .await
        .unwrap());

    let info = room.info().await.unwrap();
    assert_eq!(info.phase, Phase::NewRound, "round over forces a new round");
    assert_eq!(score_of(&info, second), 100);
    assert_eq!(score_of(&info, &drawer), 32);
}

#[tokio::test(start_paused = true)]
async fn test_wrong_guesses_change_nothing() {
    let dir = RoomDirectory::new();
    let (room, _inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella"), ("c-cora", "cora")],
    )
    .await;
    let drawer = start_round(&dir, &room, "apple").await;
    let guesser = ["ada", "bella", "cora"]
        .into_iter()
        .find(|n| *n != drawer)
        .unwrap();

    assert!(!dir
        .submit_guess("lounge", chat(guesser, "apples"))
        .await
        .unwrap());
    assert!(!dir
        .submit_guess("lounge", chat(guesser, "pear"))
        .await
        .unwrap());

    let info = room.info().await.unwrap();
    assert_eq!(score_of(&info, guesser), 0);
    assert_eq!(info.phase, Phase::GameRunning);
}

#[tokio::test(start_paused = true)]
async fn test_drawer_cannot_guess_their_own_word() {
    let dir = RoomDirectory::new();
    let (room, _inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;
    let drawer = start_round(&dir, &room, "apple").await;

    assert!(!dir
        .submit_guess("lounge", chat(&drawer, "apple"))
        .await
        .unwrap());
    assert_eq!(score_of(&room.info().await.unwrap(), &drawer), 0);
}

#[tokio::test(start_paused = true)]
async fn test_guess_outside_game_running_is_never_correct() {
    let dir = RoomDirectory::new();
    let (room, _inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;

    // WAITING_FOR_START: text match is irrelevant, the phase is wrong.
    assert_eq!(room.info().await.unwrap().phase, Phase::WaitingForStart);
    assert!(!dir
        .submit_guess("lounge", chat("bella", "apple"))
        .await
        .unwrap());

    wait_for_phase(&room, Phase::NewRound).await;
    assert!(!dir
        .submit_guess("lounge", chat("bella", "apple"))
        .await
        .unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_unguessed_round_penalizes_the_drawer() {
    let dir = RoomDirectory::new();
    let (room, mut inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;
    let drawer = start_round(&dir, &room, "apple").await;

    // Nobody guesses; the 60s window runs out.
    wait_for_phase(&room, Phase::ShowWord).await;

    let info = room.info().await.unwrap();
    assert_eq!(score_of(&info, &drawer), -50);

    // The word is revealed to the whole room.
    for inbox in inboxes.iter_mut() {
        let msgs = drain(inbox).await;
        assert!(msgs.iter().any(|m| matches!(
            m,
            GameMessage::ChosenWord(cw) if cw.chosen_word == "apple"
        )));
    }
}

// =========================================================================
// Drawing relay
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_strokes_relay_to_everyone_but_the_sender() {
    let dir = RoomDirectory::new();
    let (room, mut inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;
    let drawer = start_round(&dir, &room, "apple").await;
    let drawer_client = if drawer == "ada" { "c-ada" } else { "c-bella" };
    let (drawer_idx, other_idx) = if drawer == "ada" { (0, 1) } else { (1, 0) };

    drain(&mut inboxes[drawer_idx]).await;
    drain(&mut inboxes[other_idx]).await;

    dir.submit_drawing_event("lounge", drawer_client, stroke(MOTION_EVENT_ONGOING))
        .await
        .unwrap();

    let other_msgs = drain(&mut inboxes[other_idx]).await;
    assert_eq!(
        other_msgs
            .iter()
            .filter(|m| matches!(m, GameMessage::DrawData(_)))
            .count(),
        1
    );

    let drawer_msgs = drain(&mut inboxes[drawer_idx]).await;
    assert!(
        !drawer_msgs
            .iter()
            .any(|m| matches!(m, GameMessage::DrawData(_))),
        "strokes must not echo back to their sender"
    );
}

#[tokio::test(start_paused = true)]
async fn test_late_joiner_gets_the_drawing_replayed() {
    let dir = RoomDirectory::new();
    let (room, _inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;
    let drawer = start_round(&dir, &room, "apple").await;
    let drawer_client = if drawer == "ada" { "c-ada" } else { "c-bella" };

    dir.submit_drawing_event("lounge", drawer_client, stroke(MOTION_EVENT_ONGOING))
        .await
        .unwrap();
    dir.submit_drawing_event("lounge", drawer_client, stroke(MOTION_EVENT_FINISHED))
        .await
        .unwrap();

    let (conn, mut inbox) = connection();
    dir.join_room("lounge", "c-cora", "cora", conn).await.unwrap();

    let msgs = drain(&mut inbox).await;
    let replay = msgs
        .iter()
        .find_map(|m| match m {
            GameMessage::RoundDrawInfo(info) => Some(info.clone()),
            _ => None,
        })
        .expect("late joiner gets the round's draw log");
    assert_eq!(replay.data.len(), 2);
    // Entries replay as the serialized wire form of each stroke.
    for entry in &replay.data {
        let parsed: GameMessage = serde_json::from_str(entry).unwrap();
        assert!(matches!(parsed, GameMessage::DrawData(_)));
    }
}

#[tokio::test(start_paused = true)]
async fn test_strokes_outside_game_running_are_dropped() {
    let dir = RoomDirectory::new();
    let (room, mut inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;
    assert_eq!(room.info().await.unwrap().phase, Phase::WaitingForStart);

    dir.submit_drawing_event("lounge", "c-ada", stroke(MOTION_EVENT_ONGOING))
        .await
        .unwrap();

    let msgs = drain(&mut inboxes[1]).await;
    assert!(!msgs.iter().any(|m| matches!(m, GameMessage::DrawData(_))));
}

#[tokio::test(start_paused = true)]
async fn test_unfinished_stroke_is_finished_at_reveal() {
    init_tracing();
    let dir = RoomDirectory::new();
    let (room, mut inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;
    let drawer = start_round(&dir, &room, "apple").await;
    let drawer_client = if drawer == "ada" { "c-ada" } else { "c-bella" };

    // The round ends mid-stroke.
    dir.submit_drawing_event("lounge", drawer_client, stroke(MOTION_EVENT_ONGOING))
        .await
        .unwrap();
    wait_for_phase(&room, Phase::ShowWord).await;

    // Everyone — the drawer included — sees exactly one synthesized
    // stroke-ended segment so no canvas is left dangling.
    for inbox in inboxes.iter_mut() {
        let msgs = drain(inbox).await;
        let finished = msgs
            .iter()
            .filter(|m| matches!(
                m,
                GameMessage::DrawData(d) if d.motion_event == MOTION_EVENT_FINISHED
            ))
            .count();
        assert_eq!(finished, 1);
    }
}

// =========================================================================
// Disconnects & rejoin
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_rejoin_within_grace_restores_score_and_seat() {
    init_tracing();
    let dir = RoomDirectory::new();
    let (room, _inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella"), ("c-cora", "cora")],
    )
    .await;
    let drawer = start_round(&dir, &room, "apple").await;
    let guesser = ["ada", "bella", "cora"]
        .into_iter()
        .find(|n| *n != drawer)
        .unwrap();
    let guesser_client = format!("c-{guesser}");

    assert!(dir
        .submit_guess("lounge", chat(guesser, "apple"))
        .await
        .unwrap());
    assert_eq!(score_of(&room.info().await.unwrap(), guesser), 100);

    dir.player_disconnected("lounge", &guesser_client)
        .await
        .unwrap();
    assert_eq!(room.info().await.unwrap().player_count(), 2);

    // Back within the grace window: same score, same identity.
    tokio::time::sleep(Duration::from_secs(5)).await;
    let (conn, _inbox) = connection();
    let data = dir
        .join_room("lounge", &guesser_client, guesser, conn)
        .await
        .unwrap();
    assert_eq!(data.score, 100, "score must survive a quick reconnect");
    assert_eq!(room.info().await.unwrap().player_count(), 3);

    // Their winner status survived too: no double scoring.
    if room.info().await.unwrap().phase == Phase::GameRunning {
        assert!(!dir
            .submit_guess("lounge", chat(guesser, "apple"))
            .await
            .unwrap());
    }
}

#[tokio::test(start_paused = true)]
async fn test_rejoin_after_grace_starts_fresh() {
    let dir = RoomDirectory::new();
    let (room, _inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella"), ("c-cora", "cora")],
    )
    .await;
    let drawer = start_round(&dir, &room, "apple").await;
    let guesser = ["ada", "bella", "cora"]
        .into_iter()
        .find(|n| *n != drawer)
        .unwrap();
    let guesser_client = format!("c-{guesser}");

    assert!(dir
        .submit_guess("lounge", chat(guesser, "apple"))
        .await
        .unwrap());
    dir.player_disconnected("lounge", &guesser_client)
        .await
        .unwrap();

    // Sleep past the 60s grace window; the seat is gone for good.
    tokio::time::sleep(Duration::from_secs(90)).await;
    assert_eq!(room.info().await.unwrap().player_count(), 2);

    let (conn, _inbox) = connection();
    let data = dir
        .join_room("lounge", &guesser_client, guesser, conn)
        .await
        .unwrap();
    assert_eq!(data.score, 0, "an expired seat yields a fresh player");
}

#[tokio::test(start_paused = true)]
async fn test_join_is_idempotent_for_a_seated_client() {
    let dir = RoomDirectory::new();
    let (room, _inboxes) =
        room_with_players(&dir, 4, &[("c-ada", "ada")]).await;

    let (conn, _inbox) = connection();
    dir.join_room("lounge", "c-ada", "ada", conn).await.unwrap();

    assert_eq!(room.info().await.unwrap().player_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_empty_room_is_destroyed() {
    init_tracing();
    let dir = RoomDirectory::new();
    let (_room, _inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;

    dir.player_disconnected("lounge", "c-ada").await.unwrap();
    dir.player_disconnected("lounge", "c-bella").await.unwrap();

    // The room unregisters itself once the last active player is gone.
    for _ in 0..100 {
        if !dir.room_exists("lounge") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!dir.room_exists("lounge"));

    let (conn, _inbox) = connection();
    let result = dir.join_room("lounge", "c-cora", "cora", conn).await;
    assert!(matches!(result, Err(RoomError::NotFound(_))));
}

// =========================================================================
// Join errors
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_join_unknown_room_is_not_found() {
    let dir = RoomDirectory::new();
    let (conn, _inbox) = connection();
    let result = dir.join_room("nope", "c-ada", "ada", conn).await;
    assert!(matches!(result, Err(RoomError::NotFound(_))));
}

#[tokio::test(start_paused = true)]
async fn test_join_full_room_is_rejected() {
    let dir = RoomDirectory::new();
    let (room, _inboxes) = room_with_players(
        &dir,
        2,
        &[("c-ada", "ada"), ("c-bella", "bella")],
    )
    .await;

    let (conn, _inbox) = connection();
    let result = dir.join_room("lounge", "c-cora", "cora", conn).await;
    assert!(matches!(result, Err(RoomError::RoomFull(_))));
    assert_eq!(room.info().await.unwrap().player_count(), 2);
}

// =========================================================================
// Rotation
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_drawing_rotation_advances_each_round() {
    let dir = RoomDirectory::new();
    let (room, _inboxes) = room_with_players(
        &dir,
        4,
        &[("c-ada", "ada"), ("c-bella", "bella"), ("c-cora", "cora")],
    )
    .await;
    let first_drawer = start_round(&dir, &room, "apple").await;

    // Both guessers hit the word; the round short-circuits to NEW_ROUND.
    for name in ["ada", "bella", "cora"] {
        if name != first_drawer {
            dir.submit_guess("lounge", chat(name, "apple")).await.unwrap();
        }
    }
    let info = room.info().await.unwrap();
    assert_eq!(info.phase, Phase::NewRound);

    let second_drawer = info.drawing_player.expect("next drawer assigned");
    assert_ne!(
        second_drawer, first_drawer,
        "the rotation must hand the pen to the next player"
    );
    assert_eq!(info.players.iter().filter(|p| p.is_drawing).count(), 1);
}
