use hex_literal::hex;
use sha2::Sha512;
use xhd_wallet::{
    encode_address, verify_signature, DerivationProfile, Encoding, KeyContext, SignMetadata,
    Wallet, XPrv,
};

const MNEMONIC: &str = "salon zoo engage submit smile frost later decide wing sight chaos renew \
                        lizard rely canal coral scene hobby scare step bus leaf tobacco slice";

/// BIP-39 seed of a mnemonic with an empty passphrase: PBKDF2-HMAC-SHA512,
/// 2048 rounds, salt "mnemonic". Mnemonic handling is the caller's job; the
/// library only ever sees the 64-byte seed.
fn seed_from_mnemonic(phrase: &str) -> [u8; 64] {
    let mut seed = [0u8; 64];
    pbkdf2::pbkdf2_hmac::<Sha512>(phrase.as_bytes(), b"mnemonic", 2048, &mut seed);
    seed
}

fn message_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": { "text": { "type": "string" } },
        "required": ["text"],
    })
}

#[test]
fn bip39_seed_matches_reference() {
    let seed = seed_from_mnemonic(MNEMONIC);
    assert_eq!(seed[..8], hex!("3aff2db416b895ec"));
}

#[test]
fn root_key_matches_reference() {
    let root = XPrv::from_seed(&seed_from_mnemonic(MNEMONIC)).unwrap();
    let bytes = root.to_bytes();
    assert_eq!(bytes[..4], hex!("a8ba8002"), "kL prefix");
    assert_eq!(bytes[32..36], hex!("94592b4b"), "kR prefix");
    assert_eq!(bytes[64..68], hex!("796b9206"), "chain code prefix");
}

struct KeyGenVector {
    ctx: KeyContext,
    account: u32,
    change: u32,
    index: u32,
    expected_public_key: [u8; 32],
}

const KEY_GEN_VECTORS: &[KeyGenVector] = &[
    KeyGenVector {
        ctx: KeyContext::Address,
        account: 0,
        change: 0,
        index: 0,
        expected_public_key: hex!(
            "62fe832b7ad10544be8337a670435e5064ae4a66e77bd78909765b46b576a6f3"
        ),
    },
    KeyGenVector {
        ctx: KeyContext::Identity,
        account: 0,
        change: 0,
        index: 0,
        expected_public_key: hex!(
            "b6d7eea5af0ad83edf4340659e72f0ea2b4566de1fc3b63a40a425aabebe5e49"
        ),
    },
];

#[test]
fn key_gen_matches_reference() {
    let wallet = Wallet::new(seed_from_mnemonic(MNEMONIC));
    for vector in KEY_GEN_VECTORS {
        let public_key = wallet
            .key_gen(
                vector.ctx,
                vector.account,
                vector.change,
                vector.index,
                DerivationProfile::Khovratovich,
            )
            .unwrap();
        assert_eq!(
            hex::encode(public_key),
            hex::encode(vector.expected_public_key),
            "{:?}/{}/{}/{}",
            vector.ctx,
            vector.account,
            vector.change,
            vector.index,
        );
    }
}

#[test]
fn sign_data_matches_reference() {
    let wallet = Wallet::new(seed_from_mnemonic(MNEMONIC));
    let metadata = SignMetadata {
        encoding: Encoding::None,
        schema: message_schema(),
    };
    let message = br#"{"text":"Hello, World!"}"#;

    let signature = wallet
        .sign_data(
            KeyContext::Address,
            0,
            0,
            0,
            message,
            &metadata,
            DerivationProfile::Khovratovich,
        )
        .unwrap();
    assert_eq!(signature[..8], hex!("890df7a27330e9bc"));

    let public_key = wallet
        .key_gen(KeyContext::Address, 0, 0, 0, DerivationProfile::Khovratovich)
        .unwrap();
    assert!(verify_signature(&signature, message, &public_key));
}

#[test]
fn soft_public_derivation_first_byte_per_profile() {
    let root = XPrv::from_seed(&seed_from_mnemonic(MNEMONIC)).unwrap();
    let root_public = root.public();

    let khovratovich = root_public
        .derive_child(0, DerivationProfile::Khovratovich)
        .unwrap();
    assert_eq!(khovratovich.to_bytes()[0], 81);

    let peikert = root_public
        .derive_child(0, DerivationProfile::Peikert)
        .unwrap();
    assert_eq!(peikert.to_bytes()[0], 44);

    // the secret-side walk must land on the same child point
    for (profile, expected) in [
        (DerivationProfile::Khovratovich, khovratovich),
        (DerivationProfile::Peikert, peikert),
    ] {
        let secret_side = root.derive_child(0u32, profile).unwrap().public();
        assert_eq!(secret_side, expected);
    }
}

#[test]
fn derived_key_renders_a_well_formed_address() {
    let wallet = Wallet::new(seed_from_mnemonic(MNEMONIC));
    let public_key = wallet
        .key_gen(KeyContext::Address, 0, 0, 0, DerivationProfile::Khovratovich)
        .unwrap();
    let address = encode_address(&public_key);
    assert_eq!(address.len(), 58);
    assert!(address.bytes().all(|b| b.is_ascii_alphanumeric()));
}
