use platformer_input::Key;
use std::collections::BTreeMap;

/// A key transition at a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub down: bool,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("entry {0:?} needs key@frame or key^frame")]
    Malformed(String),
    #[error("unknown key {0:?}")]
    UnknownKey(String),
    #[error("bad frame number in {0:?}")]
    BadFrame(String),
}

/// Parse a comma list like `right@0,space@30,right^90`.
///
/// `key@frame` presses the key before that frame's tick, `key^frame`
/// releases it. Entries for one frame keep their written order.
pub fn parse_script(spec: &str) -> Result<BTreeMap<u64, Vec<KeyEvent>>, ScriptError> {
    let mut frames: BTreeMap<u64, Vec<KeyEvent>> = BTreeMap::new();
    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, frame, down) = if let Some((name, frame)) = entry.split_once('@') {
            (name, frame, true)
        } else if let Some((name, frame)) = entry.split_once('^') {
            (name, frame, false)
        } else {
            return Err(ScriptError::Malformed(entry.to_string()));
        };
        let key = Key::from_name(name).ok_or_else(|| ScriptError::UnknownKey(name.to_string()))?;
        let frame: u64 = frame
            .parse()
            .map_err(|_| ScriptError::BadFrame(entry.to_string()))?;
        frames.entry(frame).or_default().push(KeyEvent { key, down });
    }
    Ok(frames)
}
