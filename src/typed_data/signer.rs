//! Typed-Domain Signing
//!
//! ECDSA signing and recovery for typed structured data. A
//! [`TypedDomainSigner`] binds a set of struct schemas to one protocol
//! domain at construction and is then reused, stateless, for any number
//! of sign/recover calls. The private-key holder is never ambient state:
//! it enters each signing call as an explicit [`KeyHandle`] capability.

use super::encoder::SchemaTable;
use super::hasher;
use super::types::{Domain, FieldDef, Signature, TypedDataError};
use crate::address::Address;
use crate::error::{AuthorizationError, IssueError, SignError};
use crate::hash::keccak256;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

/// Capability handle over a private-key holder.
///
/// Implementations may be in-process keys or proxies to external signers
/// (hardware wallets, remote services). Signing is fallible and possibly
/// slow; callers owning latency budgets apply their own timeouts and map
/// expiry to [`SignError::Timeout`]. Independent handles may be used from
/// concurrent call sites without coordination.
pub trait KeyHandle {
    /// Sign a 32-byte digest, producing a recoverable signature.
    fn sign_digest(&self, digest: &[u8; 32]) -> Result<Signature, SignError>;
}

/// In-process secp256k1 signing key.
#[derive(Debug)]
pub struct LocalKey {
    secret: SecretKey,
}

impl LocalKey {
    /// Create from raw 32-byte key material.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignError> {
        if bytes.len() != 32 {
            return Err(SignError::InvalidKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let secret = SecretKey::from_slice(bytes).map_err(|e| SignError::InvalidKey(e.to_string()))?;
        Ok(Self { secret })
    }

    /// Create from a hex-encoded key (with or without 0x prefix).
    pub fn from_hex(candidate: &str) -> Result<Self, SignError> {
        let body = candidate
            .strip_prefix("0x")
            .or_else(|| candidate.strip_prefix("0X"))
            .unwrap_or(candidate);
        let bytes = hex::decode(body).map_err(|e| SignError::InvalidKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Address of this key's public half.
    pub fn address(&self) -> Address {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &self.secret);
        public_key_to_address(&public_key)
    }
}

impl KeyHandle for LocalKey {
    fn sign_digest(&self, digest: &[u8; 32]) -> Result<Signature, SignError> {
        let secp = Secp256k1::new();

        let message = Message::from_digest_slice(digest).map_err(|e| SignError::Failed(e.to_string()))?;

        let (recovery_id, sig_bytes) = secp
            .sign_ecdsa_recoverable(&message, &self.secret)
            .serialize_compact();

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&sig_bytes[0..32]);
        s.copy_from_slice(&sig_bytes[32..64]);

        // v is recovery_id + 27 (Ethereum convention)
        let v = recovery_id.to_i32() as u8 + 27;

        Ok(Signature::new(r, s, v))
    }
}

/// Typed-data signer bound to one protocol domain.
pub struct TypedDomainSigner {
    domain: Domain,
    types: SchemaTable,
    domain_separator: [u8; 32],
}

impl TypedDomainSigner {
    /// Register the struct schemas this signer can produce root hashes for.
    ///
    /// Registering the same type name twice with different field lists is
    /// rejected; the `EIP712Domain` meta-type is reserved.
    pub fn new(
        domain: Domain,
        schemas: impl IntoIterator<Item = (String, Vec<FieldDef>)>,
    ) -> Result<Self, TypedDataError> {
        let mut types = SchemaTable::new();

        for (name, fields) in schemas {
            if name == "EIP712Domain" {
                return Err(TypedDataError::SchemaConflict(name));
            }
            match types.get(&name) {
                Some(existing) if *existing != fields => {
                    return Err(TypedDataError::SchemaConflict(name));
                }
                _ => {
                    types.insert(name, fields);
                }
            }
        }

        let domain_separator = hasher::domain_separator(&domain);

        Ok(Self {
            domain,
            types,
            domain_separator,
        })
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn domain_separator(&self) -> &[u8; 32] {
        &self.domain_separator
    }

    /// Root hash a payload would be signed under.
    pub fn root_hash(&self, struct_name: &str, payload: &serde_json::Value) -> Result<[u8; 32], TypedDataError> {
        if !self.types.contains_key(struct_name) {
            return Err(TypedDataError::UnknownSchema(struct_name.to_string()));
        }

        let struct_hash = hasher::hash_struct(struct_name, payload, &self.types)?;
        Ok(hasher::typed_data_root(&self.domain_separator, &struct_hash))
    }

    /// Sign a typed payload through the supplied key handle.
    pub fn sign_typed_data(
        &self,
        struct_name: &str,
        payload: &serde_json::Value,
        key: &dyn KeyHandle,
    ) -> Result<Signature, IssueError> {
        let root = self.root_hash(struct_name, payload)?;
        Ok(key.sign_digest(&root)?)
    }

    /// Recover the address that signed a typed payload.
    pub fn recover_signer(
        &self,
        struct_name: &str,
        payload: &serde_json::Value,
        signature: &Signature,
    ) -> Result<Address, TypedDataError> {
        let root = self.root_hash(struct_name, payload)?;
        recover_address(&root, signature)
    }

    /// Recover and compare against the expected authority.
    ///
    /// A mismatch is an authorization failure, reported with both
    /// addresses; it is never folded into a generic invalid result.
    pub fn verify_signer(
        &self,
        struct_name: &str,
        payload: &serde_json::Value,
        signature: &Signature,
        authority: &Address,
    ) -> Result<(), AuthorizationError> {
        let recovered = self.recover_signer(struct_name, payload, signature)?;
        if recovered != *authority {
            return Err(AuthorizationError::UnauthorizedSigner {
                expected: authority.to_checksum(),
                recovered: recovered.to_checksum(),
            });
        }
        Ok(())
    }
}

/// Recover the signing address from a digest and recoverable signature.
pub fn recover_address(digest: &[u8; 32], signature: &Signature) -> Result<Address, TypedDataError> {
    let secp = Secp256k1::new();

    let recovery_bit = if signature.v >= 27 { signature.v - 27 } else { signature.v };
    let recovery_id = secp256k1::ecdsa::RecoveryId::from_i32(recovery_bit as i32)
        .map_err(|e| TypedDataError::InvalidSignature(e.to_string()))?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[0..32].copy_from_slice(&signature.r);
    sig_bytes[32..64].copy_from_slice(&signature.s);

    let recoverable_sig = secp256k1::ecdsa::RecoverableSignature::from_compact(&sig_bytes, recovery_id)
        .map_err(|e| TypedDataError::InvalidSignature(e.to_string()))?;

    let message =
        Message::from_digest_slice(digest).map_err(|e| TypedDataError::InvalidSignature(e.to_string()))?;

    let public_key = secp
        .recover_ecdsa(&message, &recoverable_sig)
        .map_err(|e| TypedDataError::InvalidSignature(e.to_string()))?;

    Ok(public_key_to_address(&public_key))
}

/// Convert a secp256k1 public key to an Ethereum address
fn public_key_to_address(public_key: &PublicKey) -> Address {
    // Uncompressed key is 65 bytes starting with 0x04; the address is the
    // last 20 bytes of the keccak of the remaining 64.
    let pubkey_bytes = public_key.serialize_uncompressed();
    let digest = keccak256(&pubkey_bytes[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..32]);
    Address::from_bytes(address)
}
