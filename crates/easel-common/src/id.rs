/// Generate a fresh palette window id. Ids are plain strings on the wire;
/// callers may also supply their own (they must stay unique for the process
/// lifetime).
pub fn new_window_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
