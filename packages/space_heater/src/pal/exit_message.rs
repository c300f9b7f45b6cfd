use std::fmt::Write;

/// Room for the longest message we can produce ("Received exit signal " + 20 digit signal
/// number + ": Exiting...\n") with some slack.
pub(crate) const EXIT_MESSAGE_CAPACITY: usize = 64;

/// Written instead of the formatted message if formatting fails.
pub(crate) const FALLBACK_EXIT_MESSAGE: &str = "Received exit signal: Exiting...\n";

/// Buffer for the stop signal diagnostic. Lives on the stack of the signal handler.
pub(crate) type ExitMessageBuffer = heapless::String<EXIT_MESSAGE_CAPACITY>;

/// Formats the stop signal diagnostic for `signal_id` into `buffer` and returns the bytes to
/// write, or the fixed fallback message if the formatted line does not fit.
///
/// Neither allocates nor takes locks, so this may be called from an asynchronous signal handler.
pub(crate) fn exit_message<const N: usize>(
    signal_id: i64,
    buffer: &mut heapless::String<N>,
) -> &[u8] {
    buffer.clear();

    if writeln!(buffer, "Received exit signal {signal_id}: Exiting...").is_ok() {
        buffer.as_bytes()
    } else {
        FALLBACK_EXIT_MESSAGE.as_bytes()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn names_the_signal() {
        let mut buffer = ExitMessageBuffer::new();

        assert_eq!(
            exit_message(2, &mut buffer),
            b"Received exit signal 2: Exiting...\n"
        );
    }

    #[test]
    fn largest_id_fits() {
        let mut buffer = ExitMessageBuffer::new();

        let message = exit_message(i64::MIN, &mut buffer);

        assert!(message.starts_with(b"Received exit signal -9223372036854775808"));
        assert!(message.ends_with(b": Exiting...\n"));
    }

    #[test]
    fn falls_back_when_buffer_too_small() {
        let mut buffer = heapless::String::<8>::new();

        assert_eq!(
            exit_message(15, &mut buffer),
            FALLBACK_EXIT_MESSAGE.as_bytes()
        );
    }

    #[test]
    fn reused_buffer_holds_only_latest_message() {
        let mut buffer = ExitMessageBuffer::new();

        _ = exit_message(1_000_000, &mut buffer);

        assert_eq!(
            exit_message(1, &mut buffer),
            b"Received exit signal 1: Exiting...\n"
        );
    }
}
