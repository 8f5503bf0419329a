//! Raw contract fields and the immutable snapshot built from them

use std::fmt;
use std::str::FromStr;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use crate::error::{GameProtocolError, GameResult};

/// 20-byte account identifier
///
/// The all-zero address is the contract's "unset" sentinel for player slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Map the sentinel to `None`
    pub fn non_zero(self) -> Option<Address> {
        if self.is_zero() { None } else { Some(self) }
    }
}

impl FromStr for Address {
    type Err = GameProtocolError;

    /// Parse a `0x`-prefixed hex address; letter case is ignored so
    /// checksummed and lowercase forms compare equal
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| GameProtocolError::InvalidAddress(format!("missing 0x prefix: {}", s)))?;

        if digits.len() != 40 {
            return Err(GameProtocolError::InvalidAddress(
                format!("expected 40 hex digits, got {}", digits.len())
            ));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Address(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Stake in the smallest currency unit (wei)
///
/// Only ever compared and stored as an exact integer. Serialized as a
/// decimal string so JSON consumers never round it through a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Stake(u128);

impl Stake {
    pub const ZERO: Stake = Stake(0);

    pub const fn from_wei(wei: u128) -> Self {
        Self(wei)
    }

    pub fn wei(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Stake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Stake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Stake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StakeVisitor;

        impl<'de> de::Visitor<'de> for StakeVisitor {
            type Value = Stake;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer wei amount, as a decimal string or integer")
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Stake, E> {
                parse_wei(s).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, n: u64) -> Result<Stake, E> {
                Ok(Stake(u128::from(n)))
            }

            fn visit_u128<E: de::Error>(self, n: u128) -> Result<Stake, E> {
                Ok(Stake(n))
            }

            fn visit_i64<E: de::Error>(self, n: i64) -> Result<Stake, E> {
                u128::try_from(n).map(Stake).map_err(|_| E::custom(format!("negative stake {}", n)))
            }

            fn visit_f64<E: de::Error>(self, n: f64) -> Result<Stake, E> {
                Err(E::custom(format!("stake {} is not an exact integer; write it as a decimal string", n)))
            }
        }

        deserializer.deserialize_any(StakeVisitor)
    }
}

fn parse_wei(s: &str) -> Result<Stake, String> {
    s.trim()
        .parse::<u128>()
        .map(Stake)
        .map_err(|e| format!("invalid stake {:?}: {}", s, e))
}

/// Exact stake from a JSON document, accepting bare numbers above `u64::MAX`
///
/// serde_json hands integers wider than `u64` to visitors as `f64`, so the
/// literal is taken from the raw document text instead.
fn stake_from_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Stake, D::Error> {
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    let text = raw.get().trim();

    if text.starts_with('"') {
        let s: String = serde_json::from_str(text).map_err(de::Error::custom)?;
        parse_wei(&s).map_err(de::Error::custom)
    } else {
        parse_wei(text).map_err(de::Error::custom)
    }
}

/// Player 1's hidden-move commitment; opaque to phase derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveCommitment([u8; 32]);

impl MoveCommitment {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for MoveCommitment {
    type Err = GameProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(MoveCommitment(bytes))
    }
}

impl fmt::Display for MoveCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for MoveCommitment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MoveCommitment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Move codes as stored by the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Move {
    Null = 0,
    Rock = 1,
    Paper = 2,
    Scissors = 3,
    Spock = 4,
    Lizard = 5,
}

impl Move {
    /// Decode a raw move code (0-5)
    pub fn from_code(code: u8) -> GameResult<Self> {
        match code {
            0 => Ok(Move::Null),
            1 => Ok(Move::Rock),
            2 => Ok(Move::Paper),
            3 => Ok(Move::Scissors),
            4 => Ok(Move::Spock),
            5 => Ok(Move::Lizard),
            other => Err(GameProtocolError::InvalidMove(other)),
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Move::Null => "None",
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
            Move::Spock => "Spock",
            Move::Lizard => "Lizard",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The seven contract fields as a reader delivers them, keyed by the
/// contract's getter names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(deserialize_with = "stake_from_json")]
    pub stake: Stake,
    pub j1: Address,
    pub j2: Address,
    #[serde(rename = "c1Hash")]
    pub c1_hash: MoveCommitment,
    pub c2: u8,
    #[serde(rename = "TIMEOUT")]
    pub timeout: u64,
    #[serde(rename = "lastAction")]
    pub last_action: u64,
    /// Set by readers that could not read every field at one block height
    #[serde(default)]
    pub provisional: bool,
}

/// Immutable point-in-time view of one game contract
///
/// Every field reflects the same on-chain instant. A reader that cannot
/// guarantee that marks the snapshot provisional and the deriver refuses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStateSnapshot {
    stake: Stake,
    player1: Address,
    player2: Address,
    commitment: MoveCommitment,
    player2_move: u8,
    timeout: u64,
    last_action: u64,
    provisional: bool,
}

impl GameStateSnapshot {
    /// Build a consistent snapshot from already-decoded fields
    pub fn new(
        stake: Stake,
        player1: Address,
        player2: Address,
        commitment: MoveCommitment,
        player2_move: u8,
        timeout: u64,
        last_action: u64,
    ) -> Self {
        Self {
            stake,
            player1,
            player2,
            commitment,
            player2_move,
            timeout,
            last_action,
            provisional: false,
        }
    }

    /// Build a snapshot from the raw reader document
    pub fn from_raw(raw: RawSnapshot) -> Self {
        Self {
            stake: raw.stake,
            player1: raw.j1,
            player2: raw.j2,
            commitment: raw.c1_hash,
            player2_move: raw.c2,
            timeout: raw.timeout,
            last_action: raw.last_action,
            provisional: raw.provisional,
        }
    }

    /// Parse the JSON snapshot document
    pub fn from_json(json: &str) -> GameResult<Self> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    /// Same fields, flagged as read across more than one instant
    pub fn into_provisional(self) -> Self {
        Self { provisional: true, ..self }
    }

    pub fn to_raw(&self) -> RawSnapshot {
        RawSnapshot {
            stake: self.stake,
            j1: self.player1,
            j2: self.player2,
            c1_hash: self.commitment,
            c2: self.player2_move,
            timeout: self.timeout,
            last_action: self.last_action,
            provisional: self.provisional,
        }
    }

    pub fn stake(&self) -> Stake {
        self.stake
    }

    /// Player 1 (committer); `None` when the slot holds the sentinel
    pub fn player1(&self) -> Option<Address> {
        self.player1.non_zero()
    }

    /// Player 2 (joiner); `None` when the slot holds the sentinel
    pub fn player2(&self) -> Option<Address> {
        self.player2.non_zero()
    }

    pub fn commitment(&self) -> &MoveCommitment {
        &self.commitment
    }

    /// Raw move code; zero means Player 2 has not moved
    pub fn player2_move_code(&self) -> u8 {
        self.player2_move
    }

    pub fn has_player2_moved(&self) -> bool {
        self.player2_move != 0
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn last_action(&self) -> u64 {
        self.last_action
    }

    pub fn is_provisional(&self) -> bool {
        self.provisional
    }

    /// SHA-256 over a fixed-width encoding of every field
    ///
    /// Two snapshots share a fingerprint iff all their fields are equal.
    pub fn fingerprint(&self) -> String {
        let mut buf = Vec::with_capacity(16 + 20 + 20 + 32 + 1 + 8 + 8 + 1);
        buf.extend_from_slice(&self.stake.wei().to_be_bytes());
        buf.extend_from_slice(self.player1.as_bytes());
        buf.extend_from_slice(self.player2.as_bytes());
        buf.extend_from_slice(self.commitment.as_bytes());
        buf.push(self.player2_move);
        buf.extend_from_slice(&self.timeout.to_be_bytes());
        buf.extend_from_slice(&self.last_action.to_be_bytes());
        buf.push(self.provisional as u8);
        crate::error::utils::sha256_hex(&buf)
    }
}
