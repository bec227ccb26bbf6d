/// Integration tests for remote calls: what reaches the transport and through which mailbox

use kbe_client::{CallContext, ClientError, EntityError, Value};
use kbe_test::{assert_single_mail, TestClient, TestEntityBuilder};

fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

/// `Avatar#7` calls `say("hi")` on its base
#[test]
fn avatar_say_reaches_base_mailbox_as_exact_bytes() {
    init_logging();
    let mut test_client = TestClient::new();
    TestEntityBuilder::new(7)
        .with_base()
        .with_cell()
        .spawn(&mut test_client)
        .unwrap();

    test_client
        .client
        .remote_call(7, CallContext::Base, "say", &[Value::from("hi")])
        .unwrap();

    let posted = test_client.client.take_outgoing();
    assert_single_mail!(posted, 7, CallContext::Base, [10u8, 0, 2, 0, 0, 0, b'h', b'i']);
}

#[test]
fn other_entities_mailboxes_stay_untouched() {
    let mut test_client = TestClient::new();
    for id in [7, 8] {
        TestEntityBuilder::new(id)
            .with_base()
            .with_cell()
            .spawn(&mut test_client)
            .unwrap();
    }

    test_client
        .client
        .base_call(7, "say", &[Value::from("hi")])
        .unwrap();

    for (id, context) in [(7, CallContext::Cell), (8, CallContext::Base), (8, CallContext::Cell)] {
        assert!(!test_client
            .client
            .entity(id)
            .unwrap()
            .mailbox(context)
            .unwrap()
            .is_open());
    }
    assert!(test_client.drain_for(8, CallContext::Base).is_empty());
}

#[test]
fn multi_argument_call_encodes_in_declaration_order() {
    let mut test_client = TestClient::new();
    TestEntityBuilder::new(3).with_base().spawn(&mut test_client).unwrap();

    test_client
        .client
        .base_call(3, "equip", &[Value::UInt(200), Value::from("axe")])
        .unwrap();

    let posted = test_client.drain_for(3, CallContext::Base);
    assert_single_mail!(
        posted,
        3,
        CallContext::Base,
        [11u8, 0, 200, 3, 0, 0, 0, b'a', b'x', b'e']
    );
}

#[test]
fn cell_call_encodes_float_little_endian() {
    let mut test_client = TestClient::new();
    TestEntityBuilder::new(3).with_cell().spawn(&mut test_client).unwrap();

    test_client
        .client
        .cell_call(3, "jump", &[Value::Float(1.0)])
        .unwrap();

    let posted = test_client.client.take_outgoing();
    let mut expected = vec![20u8, 0];
    expected.extend_from_slice(&1.0f32.to_le_bytes());
    assert_single_mail!(posted, 3, CallContext::Cell, expected);
}

#[test]
fn failed_call_posts_nothing_and_leaves_mailbox_reusable() {
    let mut test_client = TestClient::new();
    TestEntityBuilder::new(3).with_base().spawn(&mut test_client).unwrap();

    let result = test_client
        .client
        .base_call(3, "equip", &[Value::UInt(300), Value::from("axe")]);
    assert!(matches!(
        result,
        Err(ClientError::Entity(EntityError::ArgumentEncodingError { index: 0, .. }))
    ));
    assert!(test_client.client.outbox().is_empty());

    test_client
        .client
        .base_call(3, "say", &[Value::from("ok")])
        .unwrap();
    assert_eq!(test_client.client.take_outgoing().len(), 1);
}

#[test]
fn cell_method_is_not_callable_on_base() {
    let mut test_client = TestClient::new();
    TestEntityBuilder::new(3)
        .with_base()
        .with_cell()
        .spawn(&mut test_client)
        .unwrap();

    let result = test_client.client.base_call(3, "jump", &[Value::Float(1.0)]);

    assert_eq!(
        result,
        Err(ClientError::Entity(EntityError::UnknownMethod {
            class_type: "Avatar".to_string(),
            context: CallContext::Base,
            method: "jump".to_string(),
        }))
    );
}
