// Pipeline behavior under a deterministic key backend:
// * record count vs. per-item failures
// * output order equals input order
// * header emitted exactly once, including empty runs
// * generate mode produces exactly N records
// * blank and unterminated batch lines

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bip38_core::config::{Config, InputMode, Operation, OutputFormat};
    use bip38_core::keys::{Bip38Error, Bip38Key, KeyBackend, KeyError, PrivateKey};
    use bip38_core::pipeline::run_pipeline;

    // ------------------------------------------------------------
    // Deterministic backend: secret bytes derived from the token,
    // no entropy, real key types.
    // ------------------------------------------------------------
    #[derive(Clone, Copy)]
    struct FakeBackend;

    const GENERATED_TAG: u8 = 0xaa;

    fn key_from_tag(tag: u8) -> PrivateKey {
        let mut raw = [0u8; 32];
        raw[0] = 0x7f; // keep the scalar nonzero and below the group order
        raw[31] = tag;
        PrivateKey::from_bytes(&raw, false).unwrap()
    }

    fn fake_bip38(tag: u8) -> Bip38Key {
        let mut payload = [0u8; 39];
        payload[0] = 0x01;
        payload[1] = 0x42;
        payload[2] = 0xc0;
        payload[38] = tag;
        Bip38Key::parse(&bs58::encode(payload).with_check().into_string()).unwrap()
    }

    impl KeyBackend for FakeBackend {
        fn generate(&self) -> Result<PrivateKey, KeyError> {
            Ok(key_from_tag(GENERATED_TAG))
        }

        fn parse_private(&self, text: &str) -> Result<PrivateKey, KeyError> {
            match text.strip_prefix("key-").and_then(|n| n.parse::<u8>().ok()) {
                Some(tag) => Ok(key_from_tag(tag)),
                None => Err(KeyError::IncorrectFormat),
            }
        }

        fn encrypt(&self, key: &PrivateKey, _passphrase: &str) -> Bip38Key {
            fake_bip38(key.to_bytes()[31])
        }

        fn parse_encrypted(&self, text: &str) -> Result<Bip38Key, Bip38Error> {
            Bip38Key::parse(text)
        }

        fn decrypt(&self, key: &Bip38Key, _passphrase: &str) -> Result<PrivateKey, Bip38Error> {
            Ok(key_from_tag(key.to_bytes()[38]))
        }
    }

    // ------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------
    fn config(operation: Operation, input: InputMode, output: OutputFormat) -> Config {
        Config {
            operation,
            input,
            output,
            passphrase: "secret".to_string(),
        }
    }

    fn run_to_string(config: &Config, input: &str) -> String {
        let mut out = Vec::new();
        run_pipeline(config, Cursor::new(input.to_string()), &mut out, FakeBackend)
            .expect("pipeline should complete");
        String::from_utf8(out).unwrap()
    }

    fn csv_key_column(output: &str) -> Vec<String> {
        output
            .lines()
            .skip(1) // header
            .map(|line| line.split(',').next().unwrap().to_string())
            .collect()
    }

    fn expected_public(tag: u8) -> String {
        key_from_tag(tag).public_key().to_string()
    }

    // ------------------------------------------------------------
    // Tests
    // ------------------------------------------------------------
    #[test]
    fn single_input_yields_header_plus_one_line() {
        let config = config(
            Operation::Encrypt,
            InputMode::Single("  key-7  ".to_string()),
            OutputFormat::Csv,
        );
        let output = run_to_string(&config, "");

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Public Key,BIP38 Key");
        assert_eq!(
            lines[1],
            format!("{},{}", expected_public(7), fake_bip38(7))
        );
    }

    #[test]
    fn record_count_is_inputs_minus_failures() {
        let config = config(Operation::Encrypt, InputMode::Batch, OutputFormat::Csv);
        let output = run_to_string(&config, "key-1\nnot a key\nkey-3\nbogus\nkey-5\n");

        // Five lines in, two parse failures, three records out.
        assert_eq!(csv_key_column(&output).len(), 3);
    }

    #[test]
    fn output_order_equals_input_order() {
        let config = config(Operation::Encrypt, InputMode::Batch, OutputFormat::Csv);
        let output = run_to_string(&config, "key-9\nkey-2\ngarbage\nkey-11\nkey-4\n");

        let expected: Vec<String> = [9u8, 2, 11, 4].iter().map(|&t| expected_public(t)).collect();
        assert_eq!(csv_key_column(&output), expected);
    }

    #[test]
    fn header_is_written_exactly_once_for_an_empty_run() {
        let config = config(Operation::Encrypt, InputMode::Batch, OutputFormat::Csv);
        let output = run_to_string(&config, "");

        assert_eq!(output, "Public Key,BIP38 Key\n");
    }

    #[test]
    fn generate_mode_emits_exactly_n_records() {
        let config = config(Operation::Encrypt, InputMode::Generate(5), OutputFormat::Csv);
        let output = run_to_string(&config, "");

        let keys = csv_key_column(&output);
        assert_eq!(keys.len(), 5);
        assert!(keys.iter().all(|k| *k == expected_public(GENERATED_TAG)));
    }

    #[test]
    fn blank_batch_line_requests_a_fresh_key() {
        let config = config(Operation::Encrypt, InputMode::Batch, OutputFormat::Csv);
        let output = run_to_string(&config, "\n");

        assert_eq!(csv_key_column(&output), vec![expected_public(GENERATED_TAG)]);
    }

    #[test]
    fn unterminated_final_line_is_not_emitted() {
        let config = config(Operation::Encrypt, InputMode::Batch, OutputFormat::Csv);
        let output = run_to_string(&config, "key-1\nkey-2");

        // The trailing line has no newline: it arrives with the stream's
        // end-of-input and is dropped with it.
        assert_eq!(csv_key_column(&output), vec![expected_public(1)]);
    }

    #[test]
    fn decrypt_batch_skips_malformed_tokens() {
        let good_a = fake_bip38(21).to_string();
        let good_b = fake_bip38(22).to_string();
        let input = format!("{good_a}\nnot-an-encrypted-key\n{good_b}\n");

        let config = config(Operation::Decrypt, InputMode::Batch, OutputFormat::Csv);
        let output = run_to_string(&config, &input);

        let expected = vec![expected_public(21), expected_public(22)];
        assert_eq!(csv_key_column(&output), expected);
    }

    #[test]
    fn detail_sink_writes_one_delimited_block_per_record() {
        let config = config(
            Operation::Encrypt,
            InputMode::Single("key-7".to_string()),
            OutputFormat::Detail,
        );
        let output = run_to_string(&config, "");

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "---");
        assert_eq!(lines[7], "...");
        assert!(lines[1].starts_with("Address:    "));
        assert!(lines[2].starts_with("PublicHex:  "));
        assert!(lines[3].starts_with("Private:    "));
        assert!(lines[4].starts_with("PrivateHex: "));
        assert!(lines[5].starts_with("Bip38:      "));
        assert!(lines[6].starts_with("Bip38Hex:   "));
    }

    #[test]
    fn detail_sink_stays_silent_for_an_empty_run() {
        let config = config(Operation::Encrypt, InputMode::Batch, OutputFormat::Detail);
        let output = run_to_string(&config, "");

        assert!(output.is_empty());
    }

    #[test]
    fn batch_lines_are_whitespace_trimmed() {
        let config = config(Operation::Encrypt, InputMode::Batch, OutputFormat::Csv);
        let output = run_to_string(&config, "   key-13\t\r\n");

        assert_eq!(csv_key_column(&output), vec![expected_public(13)]);
    }
}
