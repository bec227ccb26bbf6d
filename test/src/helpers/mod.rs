pub mod entity_builder;
pub mod event_recorder;
pub mod test_client;

pub use entity_builder::TestEntityBuilder;
pub use event_recorder::{EventRecorder, RecordedEvent};
pub use test_client::TestClient;

/// Assert that exactly one mail was posted and that it carries `$bytes`
/// for `$entity` through `$context`
#[macro_export]
macro_rules! assert_single_mail {
    ($posted:expr, $entity:expr, $context:expr, $bytes:expr) => {
        let posted = &$posted;
        assert_eq!(posted.len(), 1, "expected exactly one posted mail, got {}", posted.len());
        assert_eq!(posted[0].entity_id, $entity, "mail posted for the wrong entity");
        assert_eq!(posted[0].context, $context, "mail posted through the wrong mailbox");
        assert_eq!(posted[0].payload.as_slice(), &$bytes[..], "unexpected mail payload");
    };
}
