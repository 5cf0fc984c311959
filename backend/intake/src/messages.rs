//! User-facing reply texts and message splitting.

/// Maximum length of one Telegram text message, in UTF-16 code units.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

pub const ACK_TEXT: &str = "📷 Получено фото. Обрабатываю...";
pub const RESULT_HEADER: &str = "📄 Распознанный текст:";
pub const NO_TEXT_FOUND: &str = "❌ Текст не найден.";
pub const PROCESSING_FAILED: &str = "⚠️ Не удалось обработать фото. Попробуйте ещё раз.";

pub fn recognition_failed(reason: &str) -> String {
    format!("⚠️ Ошибка при распознавании: {reason}")
}

/// Split `text` into messages no longer than `limit` UTF-16 code units.
///
/// Lines are kept whole where possible; a single line longer than the limit
/// is cut at character boundaries. Whitespace-only pieces are dropped.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = utf16_len(line);
        if current_len + line_len > limit && !current.is_empty() {
            push_chunk(&mut chunks, std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len <= limit {
            current.push_str(line);
            current_len += line_len;
            continue;
        }
        for c in line.chars() {
            let c_len = c.len_utf16();
            if current_len + c_len > limit {
                push_chunk(&mut chunks, std::mem::take(&mut current));
                current_len = 0;
            }
            current.push(c);
            current_len += c_len;
        }
    }
    push_chunk(&mut chunks, current);
    chunks
}

fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

fn push_chunk(chunks: &mut Vec<String>, chunk: String) {
    let trimmed = chunk.trim_end();
    if !trimmed.trim_start().is_empty() {
        chunks.push(trimmed.to_string());
    }
}
