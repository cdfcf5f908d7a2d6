use super::FeedError;
use super::logging;

#[test]
fn logging_init_accepts_levels() {
    logging::init("info");
    logging::init("debug");
    logging::init("WARNING");
    logging::init("nonsense");
}

#[test]
fn codec_error_is_wrapped() {
    let err = serde_json::from_str::<u32>("not a number").unwrap_err();
    let feed_err = FeedError::from(err);
    assert!(matches!(feed_err, FeedError::Codec(_)));
    assert!(feed_err.to_string().starts_with("message record codec failure"));
}
