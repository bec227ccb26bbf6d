/// Integration tests for server property updates flowing into the entity cache and events

use kbe_client::{Value, ON_ENTER_WORLD, ON_LEAVE_WORLD, SET_DIRECTION, SET_POSITION};
use kbe_test::{EventRecorder, RecordedEvent, TestClient, TestEntityBuilder};
use proptest::prelude::*;

#[test]
fn spawn_with_initial_position_fires_one_event() {
    let mut test_client = TestClient::new();
    let moved = EventRecorder::attach(test_client.client.events_mut(), SET_POSITION);

    TestEntityBuilder::new(4)
        .with_property("position", [5.0f32, 0.0, 5.0])
        .with_property("name", "scout")
        .spawn(&mut test_client)
        .unwrap();

    assert_eq!(
        moved.events(),
        vec![RecordedEvent {
            entity_id: Some(4),
            values: vec![Value::Vector3([0.0; 3])],
        }]
    );
    let entity = test_client.entity(4);
    assert_eq!(entity.position(), [5.0, 0.0, 5.0]);
    assert_eq!(entity.get_property("name").unwrap(), &Value::from("scout"));
}

#[test]
fn direction_update_fires_set_direction_only() {
    let mut test_client = TestClient::new();
    let moved = EventRecorder::attach(test_client.client.events_mut(), SET_POSITION);
    let turned = EventRecorder::attach(test_client.client.events_mut(), SET_DIRECTION);
    TestEntityBuilder::new(4).spawn(&mut test_client).unwrap();

    test_client
        .server_update(4, "direction", [0.0f32, 0.0, std::f32::consts::PI])
        .unwrap();

    assert_eq!(moved.count(), 0);
    assert_eq!(turned.count(), 1);
    assert!((test_client.entity(4).direction()[2] - 180.0).abs() < 1e-3);
}

#[test]
fn detached_recorder_stops_counting() {
    let mut test_client = TestClient::new();
    let moved = EventRecorder::attach(test_client.client.events_mut(), SET_POSITION);
    TestEntityBuilder::new(4).spawn(&mut test_client).unwrap();

    test_client.server_update(4, "position", [1.0f32, 0.0, 0.0]).unwrap();
    let seen = moved.events();
    assert!(moved.detach(test_client.client.events_mut()));
    test_client.server_update(4, "position", [2.0f32, 0.0, 0.0]).unwrap();

    assert_eq!(seen.len(), 1);
    assert_eq!(test_client.client.events().handler_count(SET_POSITION), 0);
}

#[test]
fn world_membership_round_trip() {
    let mut test_client = TestClient::new();
    let entered = EventRecorder::attach(test_client.client.events_mut(), ON_ENTER_WORLD);
    let left = EventRecorder::attach(test_client.client.events_mut(), ON_LEAVE_WORLD);

    TestEntityBuilder::new(9).in_world().spawn(&mut test_client).unwrap();
    assert!(test_client.entity(9).is_in_world());
    assert_eq!(test_client.client.on_entity_leave_world(9), Ok(true));
    assert_eq!(test_client.client.on_entity_leave_world(9), Ok(false));
    assert_eq!(test_client.client.on_entity_enter_world(9), Ok(true));
    test_client.client.on_disconnect();

    assert_eq!(entered.count(), 2);
    assert_eq!(left.count(), 2);
}

proptest! {
    #[test]
    fn any_hp_update_is_visible_by_name_and_id(hp in any::<i32>()) {
        let mut test_client = TestClient::new();
        TestEntityBuilder::new(1).spawn(&mut test_client).unwrap();

        test_client.server_update(1, "hp", hp).unwrap();

        let entity = test_client.entity(1);
        prop_assert_eq!(entity.get_property("hp").unwrap(), &Value::Int(hp.into()));
        prop_assert_eq!(entity.get_property_by_id(kbe_test::HP).unwrap(), &Value::Int(hp.into()));
    }

    #[test]
    fn last_position_update_wins(
        positions in prop::collection::vec(prop::array::uniform3(-1000.0f32..1000.0), 1..8)
    ) {
        let mut test_client = TestClient::new();
        let moved = EventRecorder::attach(test_client.client.events_mut(), SET_POSITION);
        TestEntityBuilder::new(1).spawn(&mut test_client).unwrap();

        for position in &positions {
            test_client.server_update(1, "position", *position).unwrap();
        }

        prop_assert_eq!(moved.count(), positions.len());
        prop_assert_eq!(test_client.entity(1).position(), *positions.last().unwrap());
    }
}
