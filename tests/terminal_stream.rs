#[cfg(unix)]
mod terminal_stream {
    use parking_lot::Mutex;
    use sensory::config::{Config, TerminalConfig};
    use sensory::stream::{StreamKind, StreamValue, TerminalStream};
    use sensory::value::{DetachedContext, Value};
    use sensory::StreamError;

    // Master descriptors are inherited across fork, so a PTY opened by one
    // test would otherwise leak into another test's emulator.
    static PTY_LOCK: Mutex<()> = parking_lot::const_mutex(());

    /// Stand-in emulator: keeps the inherited master open without a display.
    fn config_with(script: &str) -> Config {
        Config {
            terminal: TerminalConfig {
                emulator: "sh".to_string(),
                args: vec!["-c".to_string(), script.to_string()],
                slave_flag: "-S".to_string(),
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_open_write_and_halt() {
        let _guard = PTY_LOCK.lock();
        let mut stream = TerminalStream::with_config(&config_with("exec sleep 30")).unwrap();

        assert_eq!(stream.kind(), StreamKind::Terminal);
        assert!(stream.is_open());
        assert!(stream.child_id().is_some());
        assert!(stream.device().starts_with("/dev"));

        let written = stream
            .write(
                &mut DetachedContext,
                false,
                Value::strings(["hello\n"]).into(),
            )
            .unwrap();
        assert_eq!(written, Value::strings(["hello\n"]));

        stream.halt();
        stream.halt();
        assert!(!stream.is_open());
        assert!(stream.child_id().is_none());

        stream.update().unwrap();
        assert!(stream.value().is_empty());

        let err = stream
            .write(&mut DetachedContext, false, Value::item("late").into())
            .unwrap_err();
        assert!(matches!(err, StreamError::NotOpen { .. }));
    }

    #[test]
    fn test_update_yields_line_typed_into_emulator() {
        let _guard = PTY_LOCK.lock();
        // $0 is "-S<device>/<master fd>". Wait for the slave reopen, then
        // write to the master as if typed.
        let script = r#"sleep 1; printf 'typed\n' >&"${0##*/}"; exec sleep 30"#;
        let mut stream = TerminalStream::with_config(&config_with(script)).unwrap();

        stream.update().unwrap();

        assert_eq!(stream.value(), &[Value::item("typed\n")]);
        assert!(stream.is_open());
        stream.halt();
        assert!(!stream.is_open());
    }

    #[test]
    fn test_emulator_exit_is_end_of_resource() {
        let _guard = PTY_LOCK.lock();
        // Outlive the slave reopen, then hang up.
        let mut stream = TerminalStream::with_config(&config_with("sleep 1")).unwrap();

        stream.update().unwrap();

        assert!(stream.value().is_empty());
        assert!(!stream.is_open());
    }

    #[test]
    fn test_missing_emulator_fails_construction() {
        let _guard = PTY_LOCK.lock();
        let mut config = Config::default();
        config.terminal.emulator = "/nonexistent/sensory-emulator".to_string();

        let err = TerminalStream::with_config(&config).err().unwrap();

        assert!(matches!(err, StreamError::Spawn { .. }));
        assert!(err.is_resource_open());
        assert!(err.to_string().contains("/nonexistent/sensory-emulator"));
    }
}
