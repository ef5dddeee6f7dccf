use crate::SourceMessage;
use soroban_sdk::{contracttype, Address, Bytes, BytesN};

/// Outbound transfer requested by the pool owner
#[contracttype]
#[derive(Clone, Debug)]
pub struct BridgeTransferParams {
    pub input_token: Address,
    /// Token id on the destination chain
    pub output_token: BytesN<32>,
    pub input_amount: i128,
    pub output_amount: i128,
    pub destination_chain_id: u32,
    /// Pool account on the destination chain
    pub recipient: BytesN<32>,
    pub exclusive_relayer: Option<Address>,
    pub quote_timestamp: u64,
    pub fill_deadline: u64,
    pub exclusivity_deadline: u64,
    pub message: SourceMessage,
}

/// Deposit handed to the bridge spoke; `message` is an encoded
/// `DestinationMessage`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct V3Deposit {
    pub recipient: BytesN<32>,
    pub input_token: Address,
    pub output_token: BytesN<32>,
    pub input_amount: i128,
    pub output_amount: i128,
    pub destination_chain_id: u32,
    pub exclusive_relayer: Option<Address>,
    pub quote_timestamp: u64,
    pub fill_deadline: u64,
    pub exclusivity_deadline: u64,
    pub message: Bytes,
}
