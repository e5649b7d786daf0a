mod pairing_info;

pub use pairing_info::{PairingKey, PairingSlot};
