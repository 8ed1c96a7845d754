//! End-to-end mining scenarios.

use hexbin_miner_core::{
    achieved_difficulty, codec, expand, mine, mining_digest, search, verify, EncodingFault,
    MinerConfig, MinerError, NonceGenerator, NonceStrategy, SearchStrategy, MAX_DIFFICULTY,
    SEED_LEN,
};

const ZEROS: &str = "00000000000000000000000000000000000000000000000000000000";
const ADDRESS: &str = "4edd9c2a3b05d1f6b7e8a9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6";
const BLOCK: &str = "c1d2e3f4a5b60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c";

#[test]
fn zero_difficulty_single_iteration() {
    let config = MinerConfig::new(0).with_max_iterations(1);
    let result = mine(ZEROS, ZEROS, &config, &[0u8; SEED_LEN]).unwrap();

    assert!(result.found());
    assert_eq!(result.cycles, 1);
    assert_eq!(result.nonce.unwrap().as_str().len(), 32);
}

#[test]
fn full_difficulty_single_iteration() {
    let config = MinerConfig::new(MAX_DIFFICULTY).with_max_iterations(1);
    let result = mine(ZEROS, ZEROS, &config, &[0u8; SEED_LEN]).unwrap();
    assert_eq!(result.cycles, 1);
}

#[test]
fn found_nonce_verifies() {
    for nonce_strategy in NonceStrategy::ALL {
        let config = MinerConfig::new(18)
            .with_max_iterations(200_000)
            .with_nonce(nonce_strategy);
        let result = mine(ADDRESS, BLOCK, &config, &[9u8; SEED_LEN]).unwrap();
        assert!(result.found(), "{} found nothing", nonce_strategy);
        assert!(result.cycles <= 200_000);

        let nonce = result.nonce.unwrap();
        assert_eq!(
            mining_digest(ADDRESS, nonce.as_str(), BLOCK).unwrap(),
            result.digest.unwrap()
        );
        assert!(verify(ADDRESS, nonce.as_str(), BLOCK, 18).unwrap());
        assert!(achieved_difficulty(ADDRESS, nonce.as_str(), BLOCK).unwrap() >= 18);
    }
}

#[test]
fn search_strategies_find_the_same_nonce() {
    let seed = [0x5Au8; SEED_LEN];
    let results: Vec<_> = SearchStrategy::ALL
        .iter()
        .map(|&search| {
            let config = MinerConfig::new(16)
                .with_max_iterations(100_000)
                .with_search(search);
            mine(ADDRESS, BLOCK, &config, &seed).unwrap()
        })
        .collect();

    assert!(results[0].found());
    for result in &results[1..] {
        assert_eq!(result, &results[0]);
    }
}

#[test]
fn first_match_is_reported() {
    // Replay the counter sequence by hand and check nothing earlier matched.
    let seed = [1u8; SEED_LEN];
    let difficulty = 24;
    let config = MinerConfig::new(difficulty).with_max_iterations(100_000);
    let result = mine(ADDRESS, BLOCK, &config, &seed).unwrap();
    assert!(result.found());
    assert!(result.cycles > 1);

    let block_hash = codec::decode_exact::<28>(BLOCK).unwrap();
    let needle = expand(&block_hash);
    let needle = &needle.as_bytes()[..difficulty];

    let nonces = NonceGenerator::from_inputs(NonceStrategy::Counter, &seed, ADDRESS, BLOCK);
    for (i, nonce) in nonces.take(result.cycles as usize).enumerate() {
        let nonce_hex = codec::encode(&nonce);
        let digest = mining_digest(ADDRESS, &nonce_hex, BLOCK).unwrap();
        let hit = search::general_scan(expand(&digest).as_bytes(), needle).is_some();
        let last = i as u64 + 1 == result.cycles;
        assert_eq!(hit, last, "cycle {}", i + 1);
        if last {
            assert_eq!(nonce_hex, result.nonce.unwrap().as_str());
        }
    }
}

#[test]
fn scratch_seed_changes_the_search() {
    let config = MinerConfig::new(0).with_max_iterations(1);
    let a = mine(ADDRESS, BLOCK, &config, &[0u8; SEED_LEN]).unwrap();
    let b = mine(ADDRESS, BLOCK, &config, &[1u8; SEED_LEN]).unwrap();
    let again = mine(ADDRESS, BLOCK, &config, &[0u8; SEED_LEN]).unwrap();

    assert_ne!(a.nonce, b.nonce);
    assert_eq!(a, again);
}

#[test]
fn malformed_block_hash_is_rejected() {
    let config = MinerConfig::new(8);
    let seed = [0u8; SEED_LEN];

    let cases = [
        (&BLOCK[..55], "odd length"),
        (&BLOCK[..54], "short"),
        ("", "empty"),
    ];
    for (block, label) in cases {
        match mine(ADDRESS, block, &config, &seed) {
            Err(MinerError::InvalidEncoding { field, .. }) => assert_eq!(field, "block hash"),
            other => panic!("{}: unexpected {:?}", label, other),
        }
    }

    let non_hex = BLOCK.replace('c', "g");
    assert!(matches!(
        mine(ADDRESS, &non_hex, &config, &seed),
        Err(MinerError::InvalidEncoding {
            field: "block hash",
            fault: EncodingFault::InvalidCharacter { c: 'g', index: 0 }
        })
    ));
}

#[test]
fn uppercase_fingerprints_are_rejected() {
    let config = MinerConfig::new(0).with_max_iterations(1);
    let seed = [0u8; SEED_LEN];
    let upper_address = ADDRESS.to_uppercase();
    let upper_block = BLOCK.to_uppercase();

    assert!(mine(ADDRESS, BLOCK, &config, &seed).is_ok());
    assert_eq!(
        mine(&upper_address, BLOCK, &config, &seed).unwrap_err(),
        MinerError::InvalidEncoding {
            field: "address",
            fault: EncodingFault::InvalidCharacter { c: 'E', index: 1 }
        }
    );
    assert_eq!(
        mine(ADDRESS, &upper_block, &config, &seed).unwrap_err(),
        MinerError::InvalidEncoding {
            field: "block hash",
            fault: EncodingFault::InvalidCharacter { c: 'C', index: 0 }
        }
    );
}
