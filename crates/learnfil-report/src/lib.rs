//! learnfil-report: Completion certificates for LearnFIL.

pub mod certificate;

pub use certificate::Certificate;

use learnfil_core::traits::UserIdentity;

/// Escape a string for safe HTML insertion.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

impl Certificate {
    /// Certificate for `user`, with explicit overrides taking precedence.
    pub fn for_identity(
        user: &UserIdentity,
        name: Option<&str>,
        wallet: Option<&str>,
        track_name: &str,
    ) -> Self {
        Self::new(
            name.or(user.display_name.as_deref()),
            wallet.or(user.wallet_address.as_deref()),
            track_name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn identity_fields_fill_certificate() {
        let mut user = UserIdentity::new("u1");
        user.display_name = Some("Ada".into());
        user.wallet_address = Some("f1ada".into());

        let cert = Certificate::for_identity(&user, None, None, "Track");
        assert_eq!(cert.user_name, "Ada");
        assert_eq!(cert.wallet_address, "f1ada");

        let cert = Certificate::for_identity(&user, Some("Grace"), None, "Track");
        assert_eq!(cert.user_name, "Grace");
    }
}
