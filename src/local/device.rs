use tracing::{info, warn};
use uuid::Uuid;

use super::store::KeyValueStore;

const DEVICE_KEY: &str = "live-vote:device-id";

/// Returns the device id stored in `store`, creating one on first use.
///
/// If the id cannot be persisted a fresh one is still returned, so this
/// session can vote but a later session will look like a new device.
pub fn device_id(store: &dyn KeyValueStore) -> String {
    match store.get(DEVICE_KEY) {
        Ok(Some(id)) if !id.trim().is_empty() => return id,
        Ok(_) => {}
        Err(e) => warn!("Device id unreadable: {e}"),
    }

    let id = Uuid::new_v4().to_string();
    match store.set(DEVICE_KEY, &id) {
        Ok(()) => info!("Generated device id {id}"),
        Err(e) => warn!("Failed to persist device id: {e}"),
    }
    id
}
