//! Server-rendered board page for `GET /`.
//!
//! Usernames and texts are untrusted. They are escaped here before being
//! placed in markup, and the page script only ever writes them with
//! `textContent`.

use std::fmt::Write;

use crate::persistence::Message;

pub fn render_index(messages: &[Message]) -> String {
    let mut feed = String::new();
    for message in messages {
        let _ = write!(
            feed,
            r#"<div class="post" data-id="{}"><span class="username">{}</span>: <span class="text">{}</span></div>"#,
            message.id,
            escape_html(&message.username),
            escape_html(&message.text),
        );
    }
    PAGE_TEMPLATE.replace("{{FEED}}", &feed)
}

/// Escape the five characters that are significant in HTML text and attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Feedboard</title>
  <style>
    body { font-family: Arial, sans-serif; background: #f4f4f4; max-width: 700px; margin: 40px auto; padding: 20px; }
    #feed { background: #fff; padding: 15px; border: 1px solid #ddd; border-radius: 8px; height: 400px; overflow-y: auto; }
    .post { border-bottom: 1px solid #eee; padding: 5px 0; }
    .username { font-weight: bold; color: #007bff; }
    form, #controls { display: flex; gap: 10px; margin-top: 10px; }
    input { flex: 1; padding: 10px; }
  </style>
</head>
<body>
  <h1>Feedboard</h1>
  <div id="feed">{{FEED}}</div>
  <form id="postForm">
    <input id="usernameInput" placeholder="Your name">
    <input id="textInput" placeholder="Write a message...">
    <button type="submit">Send</button>
  </form>
  <div id="controls"><button id="clearBtn">Clear All Messages</button></div>
  <script>
    const feed = document.getElementById("feed");
    const seen = new Set(Array.from(feed.children, el => el.dataset.id));

    function render(post) {
      const div = document.createElement("div");
      div.className = "post";
      div.dataset.id = post.id;
      const name = document.createElement("span");
      name.className = "username";
      name.textContent = post.username;
      const text = document.createElement("span");
      text.className = "text";
      text.textContent = post.text;
      div.append(name, ": ", text);
      return div;
    }

    const proto = location.protocol === "https:" ? "wss://" : "ws://";

    // the server closes stalled viewers; a fresh connection starts with a snapshot
    function connect() {
      const socket = new WebSocket(proto + location.host + "/ws");
      socket.onmessage = ev => {
        const event = JSON.parse(ev.data);
        if (event.type === "snapshot") {
          feed.replaceChildren(...event.messages.map(render));
          seen.clear();
          event.messages.forEach(m => seen.add(String(m.id)));
        } else if (event.type === "new_post") {
          if (seen.has(String(event.id))) return;
          seen.add(String(event.id));
          feed.prepend(render(event));
        } else if (event.type === "clear_feed") {
          feed.replaceChildren();
          seen.clear();
        }
      };
      socket.onclose = () => setTimeout(connect, 1000);
    }
    connect();

    document.getElementById("postForm").onsubmit = e => {
      e.preventDefault();
      const username = document.getElementById("usernameInput").value.trim();
      const input = document.getElementById("textInput");
      fetch("/post", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ username, text: input.value })
      });
      input.value = "";
    };

    document.getElementById("clearBtn").onclick = () => fetch("/clear", { method: "POST" });
  </script>
</body>
</html>
"#;
