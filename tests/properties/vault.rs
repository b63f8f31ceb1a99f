//! Property tests for the credential vault.

use proptest::prelude::*;

use rollout::domain::ports::SecretCipher;
use rollout::infrastructure::{CredentialVault, MachineIdentity};

fn vault(user: &str, host: &str) -> CredentialVault {
    // Few rounds keep the suite fast; the format records the count anyway.
    CredentialVault::with_identity(MachineIdentity::new(user, host)).with_iterations(16)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: decrypt(encrypt(P)) == P for the same identity.
    #[test]
    fn property_round_trip_same_identity(secret in "(?s).{0,64}") {
        let v = vault("deploy", "build-01");
        let stored = v.encrypt(&secret).unwrap();
        let decrypted = v.decrypt(&stored);
        prop_assert_eq!(decrypted.expose(), secret.as_str());
    }

    /// PROPERTY: another identity never recovers a non-empty secret.
    #[test]
    fn property_other_identity_gets_empty(secret in ".{1,64}", other in "[a-z]{1,12}") {
        prop_assume!(other != "deploy");
        let stored = vault("deploy", "build-01").encrypt(&secret).unwrap();
        prop_assert!(vault(&other, "build-01").decrypt(&stored).is_empty());
    }

    /// PROPERTY: arbitrary stored text never panics and never errors loudly.
    #[test]
    fn property_garbage_decrypts_to_empty(garbage in "(?s).{0,128}") {
        prop_assume!(!garbage.is_empty());
        let _ = vault("deploy", "build-01").decrypt(&garbage);
    }
}
