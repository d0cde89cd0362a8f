//! Model types for sonos-state

mod address;
mod device;
mod field;
mod playback_state;
mod zone;

pub use address::{AddressResolver, NodeAddress, RinconSliceResolver};
pub use device::{Device, DeviceStatus};
pub use field::{FieldDelta, StatusField};
pub use playback_state::PlaybackState;
pub use zone::Zone;
