use catena_render::unescape;

/// Output panes of the chat client, made explicit so the controller never
/// reaches for ambient globals. Each required pane is an owned part of the
/// implementor; construction fails to compile without them.
pub trait ChatSurface {
    fn show_user(&mut self, text: &str);
    fn show_placeholder(&mut self);
    fn clear_placeholder(&mut self);
    /// Fragment inserted verbatim; it is already escaped server-side.
    fn insert_assistant_html(&mut self, html: &str);
    fn replace_citations_html(&mut self, html: &str);
    /// `questions` carries the original (unescaped) texts for click-to-reuse.
    fn replace_questions(&mut self, html: &str, questions: &[String]);
    fn show_failure(&mut self, message: &str);
    /// Copy text into the input and focus it.
    fn set_input(&mut self, text: &str);
}

/// Plain stdout rendering of the panes. Fragments are flattened to text
/// since a terminal has no DOM: tags dropped, the five entities decoded.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    placeholder_shown: bool,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Drop `<...>` tag spans and decode entity references for display.
pub fn fragment_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                // Adjacent blocks need a separator once flattened.
                if !text.is_empty() && !text.ends_with(' ') {
                    text.push(' ');
                }
            }
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    unescape(text.trim())
}

impl ChatSurface for TerminalSurface {
    fn show_user(&mut self, text: &str) {
        println!("you: {text}");
    }

    fn show_placeholder(&mut self) {
        self.placeholder_shown = true;
        println!("...");
    }

    fn clear_placeholder(&mut self) {
        self.placeholder_shown = false;
    }

    fn insert_assistant_html(&mut self, html: &str) {
        println!("assistant: {}", fragment_to_text(html));
    }

    fn replace_citations_html(&mut self, html: &str) {
        println!("citations: {}", fragment_to_text(html));
    }

    fn replace_questions(&mut self, _html: &str, questions: &[String]) {
        if questions.is_empty() {
            return;
        }
        println!("related questions (reuse with /N):");
        for (i, question) in questions.iter().enumerate() {
            println!("  /{} {question}", i + 1);
        }
    }

    fn show_failure(&mut self, message: &str) {
        println!("system: {message}");
    }

    fn set_input(&mut self, text: &str) {
        println!("input: {text}");
    }
}
