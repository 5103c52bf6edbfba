use serde::Serialize;

/// One published report as listed in the summary mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLink {
    pub name: String,
    pub url: String,
}

/// A plain-text message to one primary recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub to: String,
    /// Dropped when it names the primary recipient.
    pub bcc: Option<String>,
    pub subject: String,
    pub body: String,
}

impl Message {
    #[must_use]
    pub fn new(to: &str, bcc: Option<&str>, subject: String, body: String) -> Self {
        let bcc = bcc
            .map(str::trim)
            .filter(|b| !b.is_empty() && !b.eq_ignore_ascii_case(to.trim()))
            .map(str::to_owned);
        Self {
            to: to.trim().to_owned(),
            bcc,
            subject,
            body,
        }
    }
}

/// The end-of-run mail listing every report published in this run.
#[must_use]
pub fn summary_message(
    to: &str,
    bcc: Option<&str>,
    date_label: &str,
    portal_url: &str,
    links: &[ReportLink],
    signature: &str,
) -> Message {
    let mut body = format!(
        "The weekly performance reports for {date_label} are ready:\n\n\
         Reports Portal: {portal_url}\n\n\
         Direct Links:\n"
    );
    for link in links {
        body.push_str(&format!("\u{2022} {}: {}\n", link.name, link.url));
    }
    body.push_str("\nLet me know if you need any changes.\n\n");
    body.push_str(signature);

    Message::new(
        to,
        bcc,
        format!("Weekly Google Ads Reports Ready - {date_label}"),
        body,
    )
}

/// A one-line message that proves mail delivery works.
#[must_use]
pub fn test_message(to: &str) -> Message {
    Message::new(
        to,
        None,
        "Test - Report System".to_owned(),
        "This is a test email from the Report Generator.".to_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> Vec<ReportLink> {
        vec![
            ReportLink {
                name: "Acme".into(),
                url: "https://reports.example.com/acme-jan4-10/".into(),
            },
            ReportLink {
                name: "Beta Dental".into(),
                url: "https://reports.example.com/beta-jan4-10/".into(),
            },
        ]
    }

    #[test]
    fn summary_subject_and_body() {
        let msg = summary_message(
            "owner@example.com",
            Some("archive@example.com"),
            "January 4, 2026 \u{2013} January 10, 2026",
            "https://reports.example.com/",
            &links(),
            "Weekly Reports",
        );
        assert_eq!(
            msg.subject,
            "Weekly Google Ads Reports Ready - January 4, 2026 \u{2013} January 10, 2026"
        );
        assert_eq!(
            msg.body,
            "The weekly performance reports for January 4, 2026 \u{2013} January 10, 2026 are ready:\n\n\
             Reports Portal: https://reports.example.com/\n\n\
             Direct Links:\n\
             \u{2022} Acme: https://reports.example.com/acme-jan4-10/\n\
             \u{2022} Beta Dental: https://reports.example.com/beta-jan4-10/\n\
             \nLet me know if you need any changes.\n\n\
             Weekly Reports"
        );
        assert_eq!(msg.bcc.as_deref(), Some("archive@example.com"));
    }

    #[test]
    fn bcc_matching_primary_recipient_is_dropped() {
        let msg = Message::new("Owner@Example.com", Some(" owner@example.com "), String::new(), String::new());
        assert!(msg.bcc.is_none());
        let msg = Message::new("owner@example.com", Some(""), String::new(), String::new());
        assert!(msg.bcc.is_none());
    }

    #[test]
    fn summary_with_no_links_still_lists_portal() {
        let msg = summary_message("a@b.c", None, "label", "https://r.example/", &[], "Team");
        assert!(msg.body.contains("Reports Portal: https://r.example/\n\nDirect Links:\n\nLet me know"));
    }

    #[test]
    fn test_message_has_fixed_text() {
        let msg = test_message("ops@example.com");
        assert_eq!(msg.subject, "Test - Report System");
        assert_eq!(msg.body, "This is a test email from the Report Generator.");
        assert_eq!(msg.to, "ops@example.com");
    }
}
