use crate::handlers::contact_dtos::Submission;
use crate::utils::sanitize::escape_html;

pub fn subject(site_name: &str, service: &str) -> String {
    let service = service.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("New Quote Request from {} Website - {}", site_name, service)
}

/// Renders the notification sent to the business owner. All submitted values
/// are escaped before they are embedded.
pub fn render(site_name: &str, submission: &Submission) -> String {
    let site = escape_html(site_name);
    let message = escape_html(&submission.message).replace('\n', "<br>\n");

    format!(
        r#"<html>
<head>
    <title>New Quote Request - {site}</title>
</head>
<body>
    <h2>New Quote Request from {site} Website</h2>
    <p><strong>Name:</strong> {name}</p>
    <p><strong>Email:</strong> {email}</p>
    <p><strong>Phone:</strong> {phone}</p>
    <p><strong>Service Type:</strong> {service}</p>
    <p><strong>Project Description:</strong></p>
    <p>{message}</p>
    <hr>
    <p><em>This email was sent from the {site} contact form.</em></p>
</body>
</html>
"#,
        site = site,
        name = escape_html(&submission.name),
        email = escape_html(&submission.email),
        phone = escape_html(&submission.phone),
        service = escape_html(&submission.service),
        message = message,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> Submission {
        Submission {
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            phone: "555-123-4567".to_string(),
            service: "interior".to_string(),
            message: "Two rooms\nplus <hallway>".to_string(),
        }
    }

    #[test]
    fn subject_names_the_service() {
        assert_eq!(
            subject("JDD PAINTING", "interior"),
            "New Quote Request from JDD PAINTING Website - interior"
        );
        assert_eq!(
            subject("JDD PAINTING", "exterior\nrepaint"),
            "New Quote Request from JDD PAINTING Website - exterior repaint"
        );
    }

    #[test]
    fn body_embeds_every_field_escaped() {
        let html = render("JDD PAINTING", &submission());
        assert!(html.contains("<p><strong>Name:</strong> Jane</p>"));
        assert!(html.contains("<p><strong>Email:</strong> jane@x.com</p>"));
        assert!(html.contains("<p><strong>Phone:</strong> 555-123-4567</p>"));
        assert!(html.contains("<p><strong>Service Type:</strong> interior</p>"));
        assert!(html.contains("Two rooms<br>\nplus &lt;hallway&gt;"));
        assert!(html.contains("This email was sent from the JDD PAINTING contact form."));
    }
}
