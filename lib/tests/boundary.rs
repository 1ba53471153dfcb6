use slh_dsa_bridge::slh::PARAM_COUNT;
use slh_dsa_bridge::{Bridge, ParameterSet};

fn initialized(set: ParameterSet) -> Bridge {
    let bridge = Bridge::new();
    bridge
        .initialize_config(set.id() as i32)
        .expect("Failed to initialize scheme");
    bridge
}

#[test]
fn test_every_identifier_initializes() {
    let bridge = Bridge::new();
    for raw in 0..PARAM_COUNT as i32 {
        bridge.initialize_config(raw).expect("Failed to initialize");
        let info = bridge
            .current_parameters()
            .expect("Failed to query parameters")
            .expect("Parameters absent after initialize");
        let set = ParameterSet::from_raw(raw).unwrap();
        assert_eq!(info.name, set.name());
        assert!(info.n > 0);
        assert_eq!(info.is_shake, raw < 6, "hash family of id {raw}");
    }
}

#[test]
fn test_rejected_identifiers_leave_state_unchanged() {
    let bridge = initialized(ParameterSet::SHA2_192s);
    let before = bridge.current_parameters().unwrap();

    for raw in [-1, 12, 13, 255, i32::MAX] {
        assert!(bridge.initialize_config(raw).is_err());
        assert!(bridge.set_parameter_scheme(raw).is_err());
    }
    assert_eq!(bridge.current_parameters().unwrap(), before);
}

#[test]
fn test_sign_verify_round_trip() {
    let bridge = initialized(ParameterSet::SHAKE_128f);
    let pair = bridge.keygen().expect("Failed to generate keypair");

    let messages: [&[u8]; 3] = [b"", b"Hello, SLH-DSA!", &[0xFF; 4096]];
    let contexts: [&[u8]; 2] = [b"", b"application context"];
    for message in messages {
        for context in contexts {
            let signature = bridge
                .sign(Some(message), Some(context), Some(pair.private_key.as_slice()))
                .expect("Failed to sign");
            let valid = bridge
                .verify(Some(message), Some(signature.as_slice()), Some(context), Some(pair.public_key.as_slice()))
                .expect("Failed to verify");
            assert!(valid, "Signature verification failed for {} byte message", message.len());
        }
    }
}

#[test]
fn test_absent_message_and_context_are_empty() {
    let bridge = initialized(ParameterSet::SHA2_128f);
    let pair = bridge.keygen().unwrap();

    let signature = bridge
        .sign(None, None, Some(pair.private_key.as_slice()))
        .unwrap();
    let valid = bridge
        .verify(Some(b""), Some(signature.as_slice()), Some(b""), Some(pair.public_key.as_slice()))
        .unwrap();
    assert!(valid, "absent buffers must sign as empty sequences");
}

#[test]
fn test_bit_flips_are_rejected_not_faults() {
    let bridge = initialized(ParameterSet::SHAKE_128f);
    let pair = bridge.keygen().unwrap();
    let message = b"tamper sensitivity";
    let signature = bridge
        .sign(Some(message), None, Some(pair.private_key.as_slice()))
        .unwrap();

    // Randomness, a FORS node, and the last hypertree node.
    for index in [0, signature.len() / 2, signature.len() - 1] {
        for bit in [0u8, 7] {
            let mut tampered = signature.clone();
            tampered[index] ^= 1 << bit;
            let valid = bridge
                .verify(Some(message), Some(tampered.as_slice()), None, Some(pair.public_key.as_slice()))
                .expect("Tampered signature must not be a fault");
            assert!(!valid, "flip of bit {bit} at byte {index} was accepted");
        }
    }
}

#[test]
fn test_wrong_key_or_message_is_invalid() {
    let bridge = initialized(ParameterSet::SHA2_128f);
    let pair = bridge.keygen().unwrap();
    let other = bridge.keygen().unwrap();
    let signature = bridge
        .sign(Some(b"original"), None, Some(pair.private_key.as_slice()))
        .unwrap();

    assert_eq!(
        bridge.verify(Some(b"original"), Some(signature.as_slice()), None, Some(other.public_key.as_slice())),
        Ok(false)
    );
    assert_eq!(
        bridge.verify(Some(b"modified"), Some(signature.as_slice()), None, Some(pair.public_key.as_slice())),
        Ok(false)
    );
}

#[test]
fn test_wrong_length_keys_are_reported() {
    let bridge = initialized(ParameterSet::SHAKE_128f);
    let pair = bridge.keygen().unwrap();
    let signature = bridge
        .sign(Some(b"m"), None, Some(pair.private_key.as_slice()))
        .unwrap();

    let mut long_sk = pair.private_key.clone();
    long_sk.push(0);
    let err = bridge.sign(Some(b"m"), None, Some(long_sk.as_slice())).unwrap_err();
    assert_eq!(err.operation, "slhSign");

    let short_pk = &pair.public_key[..pair.public_key.len() - 1];
    let err = bridge
        .verify(Some(b"m"), Some(signature.as_slice()), None, Some(short_pk))
        .unwrap_err();
    assert_eq!(err.operation, "slhVerify");
    assert!(err.message.contains("public key"));
}

#[test]
fn test_keys_outlive_scheme_switch() {
    let bridge = initialized(ParameterSet::SHAKE_128f);
    let shake = bridge.keygen().unwrap();
    bridge.set_parameter_scheme(ParameterSet::SHA2_128f.id() as i32).unwrap();
    let sha2 = bridge.keygen().unwrap();

    // Same raw lengths, different tags.
    assert_eq!(shake.private_key.len(), sha2.private_key.len());
    assert_ne!(shake.private_key[0], sha2.private_key[0]);

    let signature = bridge
        .sign(Some(b"m"), None, Some(shake.private_key.as_slice()))
        .unwrap();
    assert_eq!(
        bridge.verify(Some(b"m"), Some(signature.as_slice()), None, Some(shake.public_key.as_slice())),
        Ok(true)
    );
    // Same length signature, but checked under the SHA2 key.
    assert_eq!(
        bridge.verify(Some(b"m"), Some(signature.as_slice()), None, Some(sha2.public_key.as_slice())),
        Ok(false)
    );
}

#[test]
#[ignore] // Slow: the 's' parameter sets take seconds per signature
fn test_round_trip_every_scheme() {
    let bridge = Bridge::new();
    for set in ParameterSet::ALL {
        bridge.initialize_config(set.id() as i32).unwrap();
        let pair = bridge.keygen().expect("Failed to generate keypair");
        let record = set.record();
        assert_eq!(pair.public_key.len(), record.pk_bytes + 1);
        assert_eq!(pair.private_key.len(), record.sk_bytes + 1);

        let signature = bridge
            .sign(Some(b"every scheme"), Some(b"ctx"), Some(pair.private_key.as_slice()))
            .unwrap();
        assert_eq!(signature.len(), record.sig_bytes, "{set} signature length");
        assert_eq!(
            bridge.verify(Some(b"every scheme"), Some(signature.as_slice()), Some(b"ctx"), Some(pair.public_key.as_slice())),
            Ok(true),
            "{set} round trip"
        );
    }
}
