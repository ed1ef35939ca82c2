use scraper::{ElementRef, Html, Selector};

/// The login form, read both before submitting it and from the answer to
/// the submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginPage {
    /// Hidden, per-page-load `form_build_id` token
    pub form_build_id: Option<String>,
    /// The page still carries the `user_login` form
    pub has_login_form: bool,
    /// Text of Drupal's error message block, if shown
    pub error_message: Option<String>,
}

impl LoginPage {
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);

        let form_build_id = first_match(&document, "[name=form_build_id]")
            .and_then(|input| input.value().attr("value").map(str::to_string));
        let has_login_form = first_match(&document, "input[name=form_id][value=user_login]").is_some();
        let error_message = first_match(&document, "div.messages.error").map(|block| {
            block
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        });

        Self {
            form_build_id,
            has_login_form,
            error_message,
        }
    }

    /// Drupal re-renders the form with an error block when it refuses a login.
    /// Either sign alone is enough, since a refused login may still leave an
    /// anonymous session cookie behind.
    pub fn rejected_reason(&self) -> Option<String> {
        match (&self.error_message, self.has_login_form) {
            (Some(message), _) => Some(message.clone()),
            (None, true) => Some("login form shown again after submitting".to_string()),
            (None, false) => None,
        }
    }
}

fn first_match<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_form_token() {
        let html = r#"
            <form id="user-login" action="/user/login" method="post">
              <input type="text" name="name" />
              <input type="password" name="pass" />
              <input type="hidden" name="form_build_id" value="form-kZ3_xYq9" />
              <input type="hidden" name="form_id" value="user_login" />
            </form>
        "#;

        let page = LoginPage::parse(html);
        assert_eq!(page.form_build_id.as_deref(), Some("form-kZ3_xYq9"));
        assert!(page.has_login_form);
        assert_eq!(page.error_message, None);
    }

    #[test]
    fn test_refused_login_answer() {
        let html = r#"
            <div class="messages error">
              <h2 class="element-invisible">Error message</h2>
              Sorry, unrecognized username or password.
            </div>
            <form id="user-login">
              <input type="hidden" name="form_build_id" value="form-next" />
              <input type="hidden" name="form_id" value="user_login" />
            </form>
        "#;

        let page = LoginPage::parse(html);
        assert_eq!(
            page.rejected_reason().as_deref(),
            Some("Error message Sorry, unrecognized username or password.")
        );
    }

    #[test]
    fn test_form_alone_counts_as_refused() {
        let html = r#"<form><input type="hidden" name="form_id" value="user_login" /></form>"#;
        assert!(LoginPage::parse(html).rejected_reason().is_some());
    }

    #[test]
    fn test_account_page_is_not_refused() {
        let html = r#"<div class="messages status">Welcome back.</div><h1>kevin</h1>"#;
        assert_eq!(LoginPage::parse(html).rejected_reason(), None);
    }

    #[test]
    fn test_missing_token() {
        let page = LoginPage::parse("<html><body><p>Maintenance</p></body></html>");
        assert_eq!(page, LoginPage::default());
    }
}
