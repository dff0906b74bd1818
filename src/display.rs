use console::style;
use termimad::MadSkin;

/// Startup banner for interactive chat
pub fn display_banner(model_label: &str) {
    println!("\n{}", style("🤖 AI ChatBot").bold().magenta());
    println!(
        "{} {}",
        style("🧠 Model:").bold().cyan(),
        style(model_label).bold()
    );
    println!(
        "{}",
        style("Type /help for commands. Press Ctrl+D or type /quit to exit.").dim()
    );
}

/// Display a plain-text reply in a formatted box - responsive width
pub fn display_response(response: &str) {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    let max_width = std::cmp::min(terminal_width.saturating_sub(4), 120).max(60);

    let wrapped_lines = wrap_text(response, max_width.saturating_sub(4));

    let content_max_len = wrapped_lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let box_width = std::cmp::min(max_width, content_max_len + 4);

    let top_border = "┌".to_string() + &"─".repeat(box_width - 2) + "┐";
    let bottom_border = "└".to_string() + &"─".repeat(box_width - 2) + "┘";

    println!("\n{}", style("💬 AI RESPONSE").bold().blue());
    println!("{}", style(&top_border).dim().blue());

    for line in wrapped_lines {
        let padding = box_width.saturating_sub(line.chars().count() + 3);
        println!("│ {}{}│", style(&line).bold().white(), " ".repeat(padding));
    }

    println!("{}", style(&bottom_border).dim().blue());
}

/// Render a markdown reply via termimad
pub fn display_markdown(response: &str) {
    println!("\n{}", style("💬 AI RESPONSE").bold().blue());
    let skin = MadSkin::default();
    skin.print_text(response);
}

/// Wraps on spaces, counting chars rather than bytes so replies with emoji
/// or CJK text never split inside a codepoint. Overlong words are cut hard.
fn wrap_text(text: &str, max_len: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in raw_line.split(' ') {
            let mut word = word;
            let mut word_len = word.chars().count();

            while word_len > max_len {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let split_at = word
                    .char_indices()
                    .nth(max_len)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                lines.push(word[..split_at].to_string());
                word = &word[split_at..];
                word_len = word.chars().count();
            }

            let needed = if current_len == 0 {
                word_len
            } else {
                current_len + 1 + word_len
            };
            if needed > max_len && current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
