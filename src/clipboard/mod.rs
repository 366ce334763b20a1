use anyhow::{Context, Result};
use arboard::Clipboard;

/// Maximum clipboard size (10MB)
const MAX_CLIPBOARD_SIZE: usize = 10 * 1024 * 1024;

/// Destination for copy actions (system clipboard, or a mock in tests)
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard via arboard, opened on first use.
///
/// Opening lazily keeps headless sessions working until something is copied.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.clipboard.is_none() {
            self.clipboard = Some(Clipboard::new().context("Failed to initialize clipboard")?);
        }
        if let Some(clipboard) = self.clipboard.as_mut() {
            clipboard.set_text(text).context("Failed to set clipboard contents")?;
        }
        Ok(())
    }
}

/// Validates clipboard text without accessing system clipboard
fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.is_empty() {
        anyhow::bail!("Cannot copy empty text to clipboard");
    }

    if text.len() > MAX_CLIPBOARD_SIZE {
        anyhow::bail!(
            "Text too large for clipboard ({} bytes, max {})",
            text.len(),
            MAX_CLIPBOARD_SIZE
        );
    }

    Ok(())
}

/// Validate `text` and hand it to `provider`.
///
/// # Errors
/// Returns error if:
/// - Text is empty
/// - Text is too large for clipboard (>10MB)
/// - The provider fails (clipboard locked, denied, or unavailable)
pub fn copy_with_provider(text: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    validate_clipboard_text(text)?;
    provider.set_text(text)
}

/// Copy text to the system clipboard.
///
/// # Platform Support
/// - macOS: pasteboard API
/// - Linux: X11 or Wayland
/// - Windows: Win32 clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    copy_with_provider(text, &mut SystemClipboard::new())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Mock clipboard for testing without system clipboard access
    #[derive(Default)]
    pub(crate) struct MockClipboard {
        pub(crate) text: Option<String>,
        pub(crate) should_fail: bool,
    }

    impl MockClipboard {
        pub(crate) fn with_failure() -> Self {
            Self { text: None, should_fail: true }
        }
    }

    impl ClipboardProvider for MockClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.should_fail {
                anyhow::bail!("Mock clipboard error");
            }
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_copy_valid_text_with_mock() {
        let mut mock = MockClipboard::default();
        assert!(copy_with_provider("Bonjour", &mut mock).is_ok());
        assert_eq!(mock.text.as_deref(), Some("Bonjour"));
    }

    #[test]
    fn test_copy_multiline_unicode_with_mock() {
        let mut mock = MockClipboard::default();
        let text = "こんにちは\n世界 🚀";
        assert!(copy_with_provider(text, &mut mock).is_ok());
        assert_eq!(mock.text.as_deref(), Some(text));
    }

    #[test]
    fn test_clipboard_provider_failure() {
        let mut mock = MockClipboard::with_failure();
        let result = copy_with_provider("This should fail", &mut mock);
        assert!(result.unwrap_err().to_string().contains("Mock clipboard error"));
    }

    #[test]
    fn test_copy_empty_text() {
        let mut mock = MockClipboard::default();
        let result = copy_with_provider("", &mut mock);
        assert!(result.unwrap_err().to_string().contains("empty"));
        assert!(mock.text.is_none());
    }

    #[test]
    fn test_copy_size_limit() {
        let mut mock = MockClipboard::default();
        let at_limit = "a".repeat(MAX_CLIPBOARD_SIZE);
        assert!(copy_with_provider(&at_limit, &mut mock).is_ok());

        let over_limit = "a".repeat(MAX_CLIPBOARD_SIZE + 1);
        let err = copy_with_provider(&over_limit, &mut mock).unwrap_err().to_string();
        assert!(err.contains("too large"));
        assert!(err.contains("bytes"));
    }

    #[test]
    fn test_copy_to_clipboard_validates_before_clipboard_access() {
        let result = copy_to_clipboard("");
        assert!(result.unwrap_err().to_string().contains("empty"));
    }
}
