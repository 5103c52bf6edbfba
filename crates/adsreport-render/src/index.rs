use adsreport_core::format::html_escape;
use adsreport_core::{Client, DateRange};

use crate::template::{Template, Values};
use crate::{Branding, TemplateError};

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const CLIENT_SECTION_TEMPLATE: &str = include_str!("../templates/client_section.html");

/// Builds the landing page that links every active client's latest report.
#[derive(Debug, Clone)]
pub struct IndexRenderer {
    page: Template,
    section: Template,
    branding: Branding,
}

impl IndexRenderer {
    #[must_use]
    pub fn new(branding: Branding) -> Self {
        Self {
            page: Template::new("index.html", INDEX_TEMPLATE),
            section: Template::new("client_section.html", CLIENT_SECTION_TEMPLATE),
            branding,
        }
    }

    /// Renders the full page. Inactive clients are left out; the rest keep
    /// their list order.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if a value map and its template disagree.
    pub fn render<'a, I>(&self, clients: I, dates: &DateRange) -> Result<String, TemplateError>
    where
        I: IntoIterator<Item = &'a Client>,
    {
        let suffix = dates.folder_suffix();
        let date_label = dates.current_label_html();
        let sections = clients
            .into_iter()
            .filter(|c| c.active)
            .map(|client| {
                self.section.render(&Values::from([
                    ("client_name", html_escape(&client.name)),
                    (
                        "report_href",
                        html_escape(&format!("/{}-{suffix}/", client.slug)),
                    ),
                    ("date_range", date_label.clone()),
                ]))
            })
            .collect::<Result<String, _>>()?;

        self.page.render(&Values::from([
            ("agency_name", html_escape(&self.branding.agency_name)),
            ("agency_url", html_escape(&self.branding.agency_url)),
            ("client_sections", sections),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn client(name: &str, slug: &str, active: bool) -> Client {
        Client {
            name: name.to_string(),
            slug: slug.to_string(),
            account_id: String::new(),
            active,
        }
    }

    fn renderer() -> IndexRenderer {
        IndexRenderer::new(Branding {
            agency_name: "North & Co".to_string(),
            agency_url: "https://north.example.com".to_string(),
        })
    }

    fn january() -> DateRange {
        DateRange::ending_on(NaiveDate::from_ymd_opt(2026, 1, 10).unwrap())
    }

    #[test]
    fn lists_active_clients_in_order() {
        let clients = vec![
            client("Zeta Dental", "zeta", true),
            client("Paused LLC", "paused", false),
            client("Acme", "acme", true),
        ];
        let html = renderer().render(&clients, &january()).unwrap();

        let zeta = html.find(r#"href="/zeta-jan4-10/""#).unwrap();
        let acme = html.find(r#"href="/acme-jan4-10/""#).unwrap();
        assert!(zeta < acme);
        assert!(!html.contains("paused"));
        assert_eq!(html.matches(r#"class="client-section""#).count(), 2);
        assert!(html.contains("January 4, 2026 &ndash; January 10, 2026"));
    }

    #[test]
    fn branding_is_escaped_and_no_placeholders_remain() {
        let html = renderer().render(&[client("A<B>", "ab", true)], &january()).unwrap();
        assert!(html.contains("<title>Client Reports | North &amp; Co</title>"));
        assert!(html.contains(r#"<a href="https://north.example.com">North &amp; Co</a>"#));
        assert!(html.contains("<span>A&lt;B&gt;</span>"));
        assert!(!html.contains("{client_sections}"));
        assert!(!html.contains("{agency_name}"));
    }

    #[test]
    fn cross_month_suffix_in_links() {
        let dates = DateRange::ending_on(NaiveDate::from_ymd_opt(2026, 1, 3).unwrap());
        let html = renderer().render(&[client("Acme", "acme", true)], &dates).unwrap();
        assert!(html.contains(r#"href="/acme-dec28-jan3/""#));
    }

    #[test]
    fn empty_client_list_still_renders_page() {
        let html = renderer().render(&[], &january()).unwrap();
        assert!(html.contains("Performance Reports"));
        assert!(!html.contains("client-section\""));
    }
}
