//! HTML for the chat page.
//!
//! The page exposes the element ids the browser widget binds to:
//! `chat-box`, `user-input`, `send-btn` and `ai-select`.

use std::fmt::Write;

use crate::bot::AiProvider;
use crate::widget::{REPLY_PATH, WidgetSettings};

/// Generate the HTML shell for the application.
pub fn html_shell(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Chat con múltiples IAs">
    <title>{title}</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 0; background: #f4f5f7; }}
        .chat-container {{ max-width: 640px; margin: 2rem auto; background: #fff; border-radius: 16px; box-shadow: 0 4px 16px rgba(0,0,0,.08); display: flex; flex-direction: column; height: 80vh; }}
        #chat-box {{ flex: 1; overflow-y: auto; padding: 1rem; }}
        .message {{ margin: .4rem 0; padding: .6rem .9rem; border-radius: 12px; max-width: 80%; white-space: pre-wrap; }}
        .user-message {{ background: #2563eb; color: #fff; margin-left: auto; }}
        .bot-message {{ background: #eef0f3; color: #111; }}
        .input-area {{ display: flex; gap: .5rem; padding: 1rem; border-top: 1px solid #e5e7eb; }}
        #user-input {{ flex: 1; padding: .6rem; border-radius: 10px; border: 1px solid #d1d5db; }}
    </style>
</head>
<body>
    {content}
</body>
</html>"#
    )
}

/// Chat page content, including the widget script.
pub fn chat_content(settings: &WidgetSettings) -> String {
    let mut options = String::new();
    for provider in AiProvider::ALL {
        let _ = write!(
            options,
            r#"<option value="{}">{}</option>"#,
            provider.tag(),
            provider.label()
        );
    }

    format!(
        r#"
    <div class="chat-container">
        <div id="chat-box" aria-live="polite"></div>
        <div class="input-area">
            <select id="ai-select">{options}</select>
            <input id="user-input" type="text" placeholder="Escribe tu mensaje..." autocomplete="off">
            <button id="send-btn" type="button">Enviar</button>
        </div>
    </div>
    <script>
    document.addEventListener('DOMContentLoaded', () => {{
        const chatBox = document.getElementById('chat-box');
        const input = document.getElementById('user-input');
        const sendBtn = document.getElementById('send-btn');
        const select = document.getElementById('ai-select');
        let pending = false;

        const render = (text, origin) => {{
            const el = document.createElement('div');
            el.classList.add('message', origin);
            el.textContent = text;
            chatBox.appendChild(el);
            chatBox.scrollTop = chatBox.scrollHeight;
        }};

        const submit = async () => {{
            const message = input.value.trim();
            if (message === '' || pending) return;
            const aiType = select.value;
            render(`${{message}} [IA: ${{aiType}}]`, 'user-message');
            input.value = '';
            pending = true;
            try {{
                const resp = await fetch('{path}', {{
                    method: 'POST',
                    headers: {{ 'Content-Type': 'application/x-www-form-urlencoded' }},
                    body: new URLSearchParams({{ message, ai_type: aiType }}),
                }});
                if (!resp.ok) throw new Error(`HTTP ${{resp.status}}`);
                const data = await resp.json();
                render(data.response, 'bot-message');
            }} catch (err) {{
                console.error('Error:', err);
                render({failure}, 'bot-message');
            }} finally {{
                pending = false;
            }}
        }};

        input.addEventListener('keypress', (e) => {{ if (e.key === 'Enter') submit(); }});
        sendBtn.addEventListener('click', submit);
        setTimeout(() => render({greeting}, 'bot-message'), {delay});
    }});
    </script>
    "#,
        path = REPLY_PATH,
        failure = js_string(&settings.failure_message),
        greeting = js_string(&settings.greeting),
        delay = settings.greeting_delay.as_millis(),
    )
}

/// Encode `text` as a JavaScript string literal safe inside a `<script>` block.
fn js_string(text: &str) -> String {
    serde_json::to_string(text)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}
