use keyforge::{ChainId, WalletRecord};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn keyforge(args: &[&str]) -> Output {
    let binary_path = assert_cmd::cargo::cargo_bin!("keyforge");
    Command::new(binary_path)
        .args(args)
        .output()
        .expect("cli runs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is utf8")
}

fn read_store(path: &Path) -> Vec<WalletRecord> {
    let json = std::fs::read_to_string(path).expect("store exists");
    serde_json::from_str(&json).expect("store is a record array")
}

#[test]
fn generate_prints_valid_phrase() {
    let output = keyforge(&["generate"]);
    assert!(output.status.success(), "generate failed: {:?}", output);
    let phrase = stdout(&output);
    assert_eq!(phrase.split_whitespace().count(), 12);
    assert!(keyforge::validate_mnemonic(&phrase));

    let output = keyforge(&["generate", "--words", "24"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).split_whitespace().count(), 24);

    let output = keyforge(&["generate", "--words", "13"]);
    assert!(!output.status.success());
}

#[test]
fn validate_exit_codes() {
    let output = keyforge(&["validate", ABANDON]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("valid"));

    // Separate words are joined
    let mut args = vec!["validate"];
    args.extend(ABANDON.split(' '));
    assert!(keyforge(&args).status.success());

    let output = keyforge(&["validate", "abandon abandon abandon"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("invalid"));
}

#[test]
fn derive_json_matches_golden_addresses() {
    let output = keyforge(&[
        "derive", "--chain", "ethereum", "--mnemonic", ABANDON, "--count", "2", "--json",
    ]);
    assert!(output.status.success(), "derive failed: {:?}", output);

    let records: Vec<WalletRecord> = serde_json::from_str(&stdout(&output)).expect("json records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].address, "0x9858effd232b4033e47d90003d41ec34ecaeda94");
    assert_eq!(records[1].address, "0x6fac4d18c912343bf86fa7049364dd4e424ab9c0");
    assert!(records.iter().all(|r| r.verify().expect("verify")));
}

#[test]
fn derive_text_output_hides_secrets() {
    let output = keyforge(&["derive", "--chain", "sol", "--mnemonic", ABANDON]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk"));
    assert!(text.contains("m/44'/501'/0'/0'"));
    assert!(!text.contains("abandon"));
    assert!(!text.contains("37df573b3ac4ad5b"));
    assert!(!String::from_utf8_lossy(&output.stderr).contains("abandon"));

    let output = keyforge(&["derive", "--chain", "sol", "--mnemonic", ABANDON, "--show-secrets"]);
    assert!(stdout(&output).contains("37df573b3ac4ad5b"));
}

#[test]
fn derive_reads_mnemonic_from_stdin() {
    let binary_path = assert_cmd::cargo::cargo_bin!("keyforge");
    let mut child = Command::new(binary_path)
        .args(["derive", "--chain", "ethereum", "--mnemonic", "-", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("cli spawns");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(ABANDON.as_bytes())
        .expect("write mnemonic");

    let output = child.wait_with_output().expect("cli exits");
    assert!(output.status.success());
    let records: Vec<WalletRecord> = serde_json::from_str(&stdout(&output)).expect("json records");
    assert_eq!(records[0].address, "0x9858effd232b4033e47d90003d41ec34ecaeda94");
}

#[test]
fn derive_rejects_bad_input() {
    let output = keyforge(&["derive", "--chain", "dogecoin"]);
    assert!(!output.status.success());

    let output = keyforge(&["derive", "--chain", "ethereum", "--mnemonic", "abandon abandon abandon"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Expected 12, 15, 18, 21 or 24 words"));
}

#[test]
fn store_continues_allocation_across_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("wallets.json");
    let store_arg = store.to_str().expect("utf8 path");

    for _ in 0..2 {
        let output = keyforge(&["derive", "--chain", "solana", "--mnemonic", ABANDON, "--store", store_arg]);
        assert!(output.status.success(), "derive failed: {:?}", output);
    }
    keyforge(&["derive", "--chain", "ethereum", "--mnemonic", ABANDON, "--store", store_arg]);

    let records = read_store(&store);
    assert_eq!(records.len(), 3);
    let solana: Vec<_> = records.iter().filter(|r| r.chain == ChainId::Solana).collect();
    assert_eq!(solana[1].path.to_string(), "m/44'/501'/1'/0'");
    assert_eq!(solana[1].address, "Hh8QwFUA6MtVu1qAoq12ucvFHNwCcVTV7hpWjeY1Hztb");

    let output = keyforge(&["list", "--store", store_arg, "--chain", "ethereum"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().count(), 1);

    let output = keyforge(&["verify", "--store", store_arg]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().filter(|l| l.starts_with("ok")).count(), 3);
}

#[test]
fn remove_keeps_later_indices() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("wallets.json");
    let store_arg = store.to_str().expect("utf8 path");

    keyforge(&["derive", "--chain", "ethereum", "--mnemonic", ABANDON, "-n", "2", "--store", store_arg]);
    let first = read_store(&store).remove(0);

    let output = keyforge(&["remove", &first.id, "--store", store_arg]);
    assert!(output.status.success());
    assert_eq!(read_store(&store).len(), 1);

    // Index 1 survives in the store, so the next wallet is index 2
    keyforge(&["derive", "--chain", "ethereum", "--mnemonic", ABANDON, "--store", store_arg]);
    let paths: Vec<_> = read_store(&store).iter().map(|r| r.path.to_string()).collect();
    assert_eq!(paths, ["m/44'/60'/0'/0/1", "m/44'/60'/0'/0/2"]);

    let output = keyforge(&["remove", "no-such-id", "--store", store_arg]);
    assert!(!output.status.success());

    let output = keyforge(&["clear", "--store", store_arg]);
    assert!(output.status.success());
    assert!(read_store(&store).is_empty());
}

#[test]
fn tampered_store_fails_verify() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("wallets.json");
    let store_arg = store.to_str().expect("utf8 path");

    keyforge(&["derive", "--chain", "ethereum", "--mnemonic", ABANDON, "--store", store_arg]);
    let json = std::fs::read_to_string(&store)
        .expect("store")
        .replace("0x9858effd232b4033e47d90003d41ec34ecaeda94", "0x0000000000000000000000000000000000000000");
    std::fs::write(&store, json).expect("write store");

    let output = keyforge(&["verify", "--store", store_arg]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("FAIL"));
}

#[test]
fn removed_last_wallet_is_not_reissued() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("wallets.json");
    let store_arg = store.to_str().expect("utf8 path");

    keyforge(&["derive", "--chain", "ethereum", "--mnemonic", ABANDON, "-n", "2", "--store", store_arg]);
    let last = read_store(&store).remove(1);
    assert_eq!(last.path.to_string(), "m/44'/60'/0'/0/1");
    assert!(dir.path().join("wallets.json.alloc.json").exists());

    let output = keyforge(&["remove", &last.id, "--store", store_arg]);
    assert!(output.status.success());

    keyforge(&["derive", "--chain", "ethereum", "--mnemonic", ABANDON, "--store", store_arg]);
    let records = read_store(&store);
    assert_eq!(records[1].path.to_string(), "m/44'/60'/0'/0/2");
    assert_ne!(records[1].address, last.address);

    // Clearing keeps the counters too
    keyforge(&["clear", "--store", store_arg]);
    keyforge(&["derive", "--chain", "ethereum", "--mnemonic", ABANDON, "--store", store_arg]);
    let records = read_store(&store);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path.to_string(), "m/44'/60'/0'/0/3");
}

#[test]
fn verify_accepts_passphrase_wallets() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("wallets.json");
    let store_arg = store.to_str().expect("utf8 path");

    let output = keyforge(&[
        "derive", "--chain", "ethereum", "--mnemonic", ABANDON, "--passphrase", "TREZOR", "--store", store_arg,
    ]);
    assert!(output.status.success());
    assert_eq!(read_store(&store)[0].address, "0x9c32f71d4db8fb9e1a58b0a80df79935e7256fa6");

    let output = keyforge(&["verify", "--store", store_arg, "--passphrase", "TREZOR"]);
    assert!(output.status.success(), "verify failed: {:?}", output);
    assert!(stdout(&output).starts_with("ok"));

    // Without the passphrase the keys do not match
    let output = keyforge(&["verify", "--store", store_arg]);
    assert_eq!(output.status.code(), Some(1));
}
