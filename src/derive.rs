/*
    Key derivation helpers built on additive tweaking.

    WP42 style: both parties compute the shared point S = a·B = b·A and the
    tweak h = HMAC-SHA256(key = S compressed, msg = invoice). The recipient
    child key is b + h and anybody holding S can compute its public key B + h·G.

    Hash commitment (pay to contract): h = SHA256(P compressed | data),
    P' = P + h·G and k' = k + h.
*/

use crate::{error::Result, hash, key::Key, public_key::PublicKey};

fn wp42_tweak(shared: &PublicKey, invoice: &[u8]) -> [u8; 32] {
    hash::hmac_sha256(&shared.serialize(), invoice)
}

/**
    Child public key of `recipient` for `invoice`, computed by the sender.
*/
pub fn wp42_public_key(sender: &Key, recipient: &PublicKey, invoice: &[u8]) -> Result<PublicKey> {
    let shared = sender.ecdh(recipient)?;
    recipient.add_hash(&wp42_tweak(&shared, invoice))
}

/**
    Child private key for `invoice`, computed by the recipient from the
    sender's public key.
*/
pub fn wp42_private_key(recipient: &Key, sender: &PublicKey, invoice: &[u8]) -> Result<Key> {
    let shared = recipient.ecdh(sender)?;
    recipient.add_hash(&wp42_tweak(&shared, invoice))
}

fn commitment(public_key: &PublicKey, data: &[u8]) -> [u8; 32] {
    let mut preimage = public_key.serialize().to_vec();
    preimage.extend_from_slice(data);
    hash::sha256(preimage)
}

/// P + SHA256(P | data)·G
pub fn commit_public_key(public_key: &PublicKey, data: &[u8]) -> Result<PublicKey> {
    public_key.add_hash(&commitment(public_key, data))
}

/// k + SHA256(k·G | data)
pub fn commit_key(key: &Key, data: &[u8]) -> Result<Key> {
    key.add_hash(&commitment(&key.public_key(), data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    #[test]
    fn wp42_parties_agree() -> Result<()> {
        for _i in 0..5 {
            let alice = Key::generate(Network::MainNet);
            let bob = Key::generate(Network::MainNet);

            let child_pub = wp42_public_key(&alice, &bob.public_key(), b"invoice 1")?;
            let child = wp42_private_key(&bob, &alice.public_key(), b"invoice 1")?;
            assert_eq!(child.public_key(), child_pub);

            let other = wp42_public_key(&alice, &bob.public_key(), b"invoice 2")?;
            assert_ne!(other, child_pub);
        }
        Ok(())
    }

    #[test]
    fn commitment_pair_matches() -> Result<()> {
        let k = Key::generate(Network::MainNet);
        let committed = commit_key(&k, b"contract")?;
        assert_eq!(committed.public_key(), commit_public_key(&k.public_key(), b"contract")?);
        assert_ne!(committed, k);
        Ok(())
    }
}
