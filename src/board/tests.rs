use super::{Board, DEFAULT_USERNAME, normalize_username};
use crate::broker::{FeedEvent, Hub};
use crate::persistence::{Message, MessageLog, MessageStore};
use crate::session::Session;
use crate::utils::{FeedError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use tempfile::{TempDir, tempdir};

fn create_board() -> (Board, TempDir) {
    let dir = tempdir().unwrap();
    let store = Arc::new(MessageStore::open(dir.path()).unwrap());
    (Board::new(store, Arc::new(Hub::new())), dir)
}

#[test]
fn test_normalize_username() {
    assert_eq!(normalize_username(None), DEFAULT_USERNAME);
    assert_eq!(normalize_username(Some("")), "Anonymous");
    assert_eq!(normalize_username(Some("bob")), "bob");
    assert_eq!(normalize_username(Some("  ")), "  ");
}

#[test]
fn test_post_with_empty_username_stores_default() {
    let (board, _dir) = create_board();
    let message = board.post(Some(""), Some("hi")).unwrap();

    assert_eq!(message.username, "Anonymous");
    assert_eq!(board.history().unwrap()[0].username, "Anonymous");
}

#[test]
fn test_post_without_text_stores_empty_text() {
    let (board, _dir) = create_board();
    let message = board.post(Some("bob"), None).unwrap();
    assert_eq!(message.text, "");
}

#[test]
fn test_history_matches_posts_newest_first() {
    let (board, _dir) = create_board();
    let posted: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|t| board.post(Some("bob"), Some(t)).unwrap())
        .collect();

    let history = board.history().unwrap();
    let expected: Vec<_> = posted.into_iter().rev().collect();
    assert_eq!(history, expected);
}

#[test]
fn test_post_broadcasts_exactly_once() {
    let (board, _dir) = create_board();
    let (session, mut rx) = Session::channel(8);
    board.hub().register(session);

    board.post(Some("bob"), Some("hi")).unwrap();

    match rx.try_recv().unwrap() {
        FeedEvent::NewPost(m) => {
            assert_eq!(m.username, "bob");
            assert_eq!(m.text, "hi");
        }
        other => panic!("Expected NewPost, got {other:?}"),
    }
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_post_is_stored_even_when_nobody_listens() {
    let (board, _dir) = create_board();
    let (session, rx) = Session::channel(1);
    board.hub().register(session);
    drop(rx);

    board.post(Some("bob"), Some("hi")).unwrap();
    assert_eq!(board.history().unwrap().len(), 1);
}

#[test]
fn test_clear_wipes_and_broadcasts() {
    let (board, _dir) = create_board();
    board.post(Some("bob"), Some("one")).unwrap();
    board.post(Some("bob"), Some("two")).unwrap();

    let (session, mut rx) = Session::channel(8);
    board.hub().register(session);

    board.clear().unwrap();
    assert!(board.history().unwrap().is_empty());
    assert_eq!(rx.try_recv().unwrap(), FeedEvent::ClearFeed);
}

#[test]
fn test_session_registered_after_clear_sees_only_later_posts() {
    let (board, _dir) = create_board();
    board.post(Some("bob"), Some("old")).unwrap();
    board.clear().unwrap();

    let (session, mut rx) = Session::channel(8);
    board.hub().register(session);
    assert!(rx.try_recv().is_err());

    board.post(Some("bob"), Some("new")).unwrap();
    match rx.try_recv().unwrap() {
        FeedEvent::NewPost(m) => assert_eq!(m.text, "new"),
        other => panic!("Expected NewPost, got {other:?}"),
    }
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_concurrent_posts_store_and_deliver_each_once() {
    const POSTERS: usize = 16;

    let (board, _dir) = create_board();
    let mut receivers = Vec::new();
    for _ in 0..3 {
        let (session, rx) = Session::channel(POSTERS);
        board.hub().register(session);
        receivers.push(rx);
    }

    let handles: Vec<_> = (0..POSTERS)
        .map(|i| {
            let board = board.clone();
            thread::spawn(move || {
                board
                    .post(Some(&format!("user{i}")), Some("hello"))
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let history = board.history().unwrap();
    assert_eq!(history.len(), POSTERS);
    let ids: HashSet<_> = history.iter().map(|m| m.id).collect();
    assert_eq!(ids.len(), POSTERS);

    for mut rx in receivers {
        let mut count = 0;
        while let Ok(FeedEvent::NewPost(_)) = rx.try_recv() {
            count += 1;
        }
        assert_eq!(count, POSTERS);
    }
}

#[test]
fn test_concurrent_post_and_clear_keep_viewers_in_step_with_store() {
    for _ in 0..50 {
        let (board, _dir) = create_board();
        let (session, mut rx) = Session::channel(1024);
        board.hub().register(session);

        let poster = {
            let board = board.clone();
            thread::spawn(move || {
                for i in 0..5 {
                    board.post(Some("bob"), Some(&format!("msg{i}"))).unwrap();
                }
            })
        };
        let clearer = {
            let board = board.clone();
            thread::spawn(move || {
                for _ in 0..5 {
                    board.clear().unwrap();
                }
            })
        };
        poster.join().unwrap();
        clearer.join().unwrap();

        let mut live_view = HashSet::new();
        while let Ok(event) = rx.try_recv() {
            match event {
                FeedEvent::NewPost(m) => {
                    live_view.insert(m.id);
                }
                FeedEvent::ClearFeed => live_view.clear(),
            }
        }
        let stored: HashSet<_> = board.history().unwrap().iter().map(|m| m.id).collect();
        assert_eq!(live_view, stored);
    }
}

/// A store whose every operation fails like an unavailable disk.
struct UnavailableStore;

fn unavailable() -> FeedError {
    FeedError::Storage(sled::Error::Io(std::io::Error::other("disk unavailable")))
}

impl MessageLog for UnavailableStore {
    fn insert_then<R>(
        &self,
        _username: &str,
        _text: &str,
        _f: impl FnOnce(&Message) -> R,
    ) -> Result<(Message, R)> {
        Err(unavailable())
    }

    fn clear_then<R>(&self, _f: impl FnOnce() -> R) -> Result<R> {
        Err(unavailable())
    }

    fn snapshot_then<R>(&self, _f: impl FnOnce() -> R) -> Result<(Vec<Message>, R)> {
        Err(unavailable())
    }

    fn list_all(&self) -> Result<Vec<Message>> {
        Err(unavailable())
    }
}

#[test]
fn test_failed_insert_is_not_broadcast() {
    let board = Board::new(Arc::new(UnavailableStore), Arc::new(Hub::new()));
    let (session, mut rx) = Session::channel(8);
    board.hub().register(session);

    let err = board.post(Some("bob"), Some("hi")).unwrap_err();
    assert!(matches!(err, FeedError::Storage(_)));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_failed_clear_is_not_broadcast() {
    let board = Board::new(Arc::new(UnavailableStore), Arc::new(Hub::new()));
    let (session, mut rx) = Session::channel(8);
    board.hub().register(session);

    assert!(board.clear().is_err());
    assert!(rx.try_recv().is_err());
    // the hub itself is untouched by the storage failure
    assert_eq!(board.hub().session_count(), 1);
}

#[test]
fn test_failed_snapshot_does_not_register_viewer() {
    let board = Board::new(Arc::new(UnavailableStore), Arc::new(Hub::new()));
    assert!(crate::session::connect(&board, 8).is_err());
    assert_eq!(board.hub().session_count(), 0);
}
