use serde::Deserialize;

/// Raw input vocabulary, in screen pixels with the origin at the top-left.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InputEvent {
    PointerDown { pos: [f64; 2] },
    PointerMove { pos: [f64; 2] },
    PointerUp,
    Wheel { delta_y: f64 },
    Click { pos: [f64; 2] },
    TouchStart { touches: Vec<[f64; 2]> },
    TouchMove { touches: Vec<[f64; 2]> },
    TouchEnd,
    Resize { width: f64, height: f64 },
}

/// An input event stamped with the time it arrived.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedInput {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: InputEvent,
}

#[cfg(test)]
mod tests {
    use super::{InputEvent, TimedInput};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_tagged_script() {
        let script: Vec<TimedInput> = serde_json::from_str(
            r#"[
                { "atMs": 0, "type": "touchStart", "touches": [[10, 20], [30, 40]] },
                { "atMs": 16, "type": "wheel", "deltaY": -120 },
                { "atMs": 32, "type": "touchEnd" }
            ]"#,
        )
        .unwrap();

        assert_eq!(
            script[0].event,
            InputEvent::TouchStart {
                touches: vec![[10.0, 20.0], [30.0, 40.0]]
            }
        );
        assert_eq!(script[1].event, InputEvent::Wheel { delta_y: -120.0 });
        assert_eq!(script[2].at_ms, 32);
    }
}
