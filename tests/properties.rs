use std::collections::HashSet;

use serde_json::json;
use xhd_wallet::{
    derive_path, validate_data, verify_signature, DerivationProfile, Encoding, Error, KeyContext,
    SignMetadata, Wallet, XPrv, H, RESERVED_PREFIXES,
};

fn wallet_with_seed(tag: u8) -> Wallet {
    Wallet::new([tag; 64])
}

fn permissive_metadata() -> SignMetadata {
    SignMetadata {
        encoding: Encoding::None,
        schema: json!({ "type": "object" }),
    }
}

#[test]
fn key_gen_is_deterministic() {
    for profile in [DerivationProfile::Peikert, DerivationProfile::Khovratovich] {
        let a = wallet_with_seed(1)
            .key_gen(KeyContext::Address, 1, 0, 3, profile)
            .unwrap();
        let b = wallet_with_seed(1)
            .key_gen(KeyContext::Address, 1, 0, 3, profile)
            .unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn distinct_paths_yield_distinct_keys() {
    let wallet = wallet_with_seed(2);
    let mut seen = HashSet::new();
    for ctx in [KeyContext::Address, KeyContext::Identity] {
        for account in 0..6 {
            for change in 0..6 {
                for index in 0..6 {
                    let public_key = wallet
                        .key_gen(ctx, account, change, index, DerivationProfile::Khovratovich)
                        .unwrap();
                    assert!(
                        seen.insert(public_key),
                        "collision at {ctx:?}/{account}/{change}/{index}"
                    );
                }
            }
        }
    }
    assert_eq!(seen.len(), 432);
}

#[test]
fn soft_public_derivation_matches_key_gen() {
    let wallet = wallet_with_seed(3);
    let root = XPrv::from_seed(&[3; 64]).unwrap();
    for profile in [DerivationProfile::Peikert, DerivationProfile::Khovratovich] {
        let account_prefix = [H + 44, H + KeyContext::Address.coin_type(), H, 0];
        let parent = derive_path(&root, &account_prefix, profile).unwrap().public();
        for index in 0..5 {
            let soft = parent.derive_child(index, profile).unwrap();
            let direct = wallet
                .key_gen(KeyContext::Address, 0, 0, index, profile)
                .unwrap();
            assert_eq!(soft.to_bytes()[..32], direct, "index {index}");
        }
    }
}

#[test]
fn signature_verification_rejects_single_byte_mutations() {
    let wallet = wallet_with_seed(4);
    let data = br#"{"text":"round trip"}"#;
    let signature = wallet
        .sign_data(
            KeyContext::Address,
            0,
            0,
            0,
            data,
            &permissive_metadata(),
            DerivationProfile::Khovratovich,
        )
        .unwrap();
    let public_key = wallet
        .key_gen(KeyContext::Address, 0, 0, 0, DerivationProfile::Khovratovich)
        .unwrap();
    assert!(verify_signature(&signature, data, &public_key));

    let mut mutated = data.to_vec();
    mutated[5] ^= 0x01;
    assert!(!verify_signature(&signature, &mutated, &public_key));

    for position in [0, 20, 40, 63] {
        let mut bad = signature;
        bad[position] ^= 0x01;
        assert!(!verify_signature(&bad, data, &public_key), "byte {position}");
    }

    let mut bad_key = public_key;
    bad_key[10] ^= 0x01;
    assert!(!verify_signature(&signature, data, &bad_key));
}

#[test]
fn reserved_tags_are_never_signable() {
    let wallet = wallet_with_seed(5);
    let metadata = permissive_metadata();
    for tag in RESERVED_PREFIXES {
        let mut data = tag.as_bytes().to_vec();
        data.extend_from_slice(br#"{"text":"hi"}"#);
        assert!(!validate_data(&data, &metadata), "tag {tag}");
        assert_eq!(
            wallet.sign_data(
                KeyContext::Address,
                0,
                0,
                0,
                &data,
                &metadata,
                DerivationProfile::Khovratovich,
            ),
            Err(Error::DataValidation),
            "tag {tag}"
        );
    }
}

#[test]
fn transaction_signing_skips_the_guard() {
    let wallet = wallet_with_seed(6);
    let transaction = b"TX\x89prefixed by the host chain";
    let signature = wallet
        .sign_transaction(
            KeyContext::Address,
            0,
            0,
            0,
            transaction,
            DerivationProfile::Khovratovich,
        )
        .unwrap();
    let public_key = wallet
        .key_gen(KeyContext::Address, 0, 0, 0, DerivationProfile::Khovratovich)
        .unwrap();
    assert!(verify_signature(&signature, transaction, &public_key));
}

#[test]
fn key_agreement_is_symmetric_under_opposite_ordering() {
    let alice = wallet_with_seed(7);
    let bob = wallet_with_seed(8);
    let profile = DerivationProfile::Khovratovich;

    let alice_pk = alice
        .key_gen(KeyContext::Identity, 0, 0, 0, profile)
        .unwrap();
    let bob_pk = bob.key_gen(KeyContext::Identity, 0, 0, 0, profile).unwrap();

    let a = alice
        .key_agreement(KeyContext::Identity, 0, 0, 0, &bob_pk, true, profile)
        .unwrap();
    let b = bob
        .key_agreement(KeyContext::Identity, 0, 0, 0, &alice_pk, false, profile)
        .unwrap();
    assert_eq!(a, b);

    let c = alice
        .key_agreement(KeyContext::Identity, 0, 0, 0, &bob_pk, false, profile)
        .unwrap();
    let d = bob
        .key_agreement(KeyContext::Identity, 0, 0, 0, &alice_pk, true, profile)
        .unwrap();
    assert_eq!(c, d);

    assert_ne!(a, c);
}

#[test]
fn child_index_classification() {
    use xhd_wallet::{ChildIndex, HardenedIndex, NonHardenedIndex};

    assert!(matches!(ChildIndex::from(5), ChildIndex::NonHardened(_)));
    assert!(matches!(ChildIndex::from(H + 5), ChildIndex::Hardened(_)));
    assert_eq!(u32::from(ChildIndex::from(7)), 7);

    assert_eq!(u32::from(HardenedIndex::try_from(H + 1).unwrap()), H + 1);
    assert_eq!(u32::from(NonHardenedIndex::try_from(9).unwrap()), 9);
    assert!(HardenedIndex::try_from(3).is_err());
    assert!(NonHardenedIndex::try_from(H).is_err());

    assert_eq!(*HardenedIndex::MIN, H);
    assert_eq!(*NonHardenedIndex::MAX, H - 1);
}

#[test]
fn hardened_components_require_the_secret_side() {
    let root_public = XPrv::from_seed(&[9; 64]).unwrap().public();
    assert_eq!(
        root_public
            .derive_child(H + 44, DerivationProfile::Khovratovich)
            .unwrap_err(),
        Error::InvalidIndex
    );
}
