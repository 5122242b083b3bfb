use maud::{html, Markup, Render};

pub struct LinkButton {
    inner: Markup,
    href: String,
    button_type: ButtonType,
}

impl LinkButton {
    pub fn primary(inner: Markup, href: impl Into<String>) -> Self {
        Self {
            inner,
            href: href.into(),
            button_type: ButtonType::Primary,
        }
    }

    pub fn secondary(inner: Markup, href: impl Into<String>) -> Self {
        Self {
            inner,
            href: href.into(),
            button_type: ButtonType::Secondary,
        }
    }

    pub fn danger(inner: Markup, href: impl Into<String>) -> Self {
        Self {
            inner,
            href: href.into(),
            button_type: ButtonType::Danger,
        }
    }
}

pub enum ButtonType {
    Primary,
    Secondary,
    Danger,
}

impl ButtonType {
    fn class(&self) -> &str {
        match &self {
            ButtonType::Primary => "button button-primary",
            ButtonType::Secondary => "button button-secondary",
            ButtonType::Danger => "button button-danger",
        }
    }
}

impl Render for LinkButton {
    fn render(&self) -> Markup {
        html! {
          a href=(self.href) class=(self.button_type.class()) {
            (self.inner)
          }
        }
    }
}
