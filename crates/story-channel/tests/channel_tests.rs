use pretty_assertions::assert_eq;
use story_channel::{Channel, ChannelError, Envelope, Event, RefHandle};

#[tokio::test]
async fn test_events_cross_tasks_in_order() {
    let channel = Channel::new();
    let mut subscription = channel.subscribe();

    let emitter = channel.clone();
    tokio::spawn(async move {
        for id in ["a--1", "a--2", "b--1"] {
            emitter.emit_local(Event::CurrentStoryWasSet {
                story_id: id.to_string(),
            });
        }
        emitter.close();
    })
    .await
    .unwrap();

    let mut seen = Vec::new();
    while let Ok(envelope) = subscription.recv().await {
        if let Event::CurrentStoryWasSet { story_id } = envelope.event {
            seen.push(story_id);
        }
    }
    assert_eq!(seen, vec!["a--1", "a--2", "b--1"]);
}

#[tokio::test]
async fn test_subscribing_after_close_is_closed() {
    let channel = Channel::new();
    channel.close();

    let mut late = channel.subscribe();
    assert_eq!(channel.subscriber_count(), 0);
    assert_eq!(late.recv().await.unwrap_err(), ChannelError::Closed);
}

#[test]
fn test_ref_frame_from_wire() {
    let frame = r#"{
        "event": { "type": "story-args-updated", "storyId": "a--1", "args": { "x": 1 } },
        "source": { "kind": "ref", "id": "design" }
    }"#;

    let envelope = Envelope::from_json(frame).unwrap();
    assert_eq!(envelope.source.as_ref_handle(), Some(&RefHandle::new("design")));
    assert_eq!(envelope.event.name(), "story-args-updated");
    assert!(!envelope.event.is_outbound());
}
