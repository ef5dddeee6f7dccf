use soroban_sdk::xdr::{FromXdr, ToXdr};
use soroban_sdk::{contracttype, Bytes, Env};

/// What a cross-chain movement means for NAV on both sides.
///
/// `Invalid` is the zero value a default or corrupted message decodes to;
/// every entry point rejects it.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum OpType {
    Invalid = 0,
    /// Value relocates between chains; both legs stay NAV-neutral
    Transfer = 1,
    /// Value moves to realign NAV between chains
    Rebalance = 2,
    /// Value change is real on both chains
    Sync = 3,
}

/// Message attached by the pool owner to an outbound transfer
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceMessage {
    pub op_type: OpType,
    /// Allowed deviation in basis points
    pub nav_tolerance: u32,
    /// Destination unwraps the wrapped-native token on arrival
    pub should_unwrap_on_destination: bool,
    /// Native amount wrapped before the transfer leaves (0 = none)
    pub source_native_amount: i128,
}

/// Message delivered by the bridge together with the tokens
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DestinationMessage {
    pub op_type: OpType,
    pub source_chain_id: u32,
    /// Unitary value on the source chain when the transfer left (0 = no hint)
    pub source_nav: i128,
    /// Decimals `source_nav` is expressed in
    pub source_decimals: u32,
    /// Allowed deviation in basis points (0 = unchecked)
    pub nav_tolerance: u32,
    pub should_unwrap: bool,
    /// Amount that left the source chain (0 = no hint)
    pub source_amount: i128,
}

impl DestinationMessage {
    /// XDR encoding handed to the bridge
    pub fn encode(&self, env: &Env) -> Bytes {
        self.clone().to_xdr(env)
    }

    /// Returns `None` when the bytes hold a value of another shape
    pub fn decode(env: &Env, bytes: &Bytes) -> Option<Self> {
        Self::from_xdr(env, bytes).ok()
    }
}

/// Parameters of a donation call
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationParams {
    pub op_type: OpType,
}
