pub const CHAT_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head>
    <title>EduGuard AI Counselor</title>
    <style>
        body { font-family: Arial, sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; background: #f9fafb; }
        .container { background: #ffffff; padding: 25px; border-radius: 10px; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
        .messages { height: 420px; overflow-y: auto; padding: 10px; border: 1px solid #e5e7eb; border-radius: 8px; }
        .message { margin: 10px 0; display: flex; }
        .message.visitor { justify-content: flex-end; }
        .bubble { max-width: 80%; padding: 10px 16px; border-radius: 16px; white-space: pre-wrap; }
        .visitor .bubble { background: #3b82f6; color: white; }
        .assistant .bubble { background: #f3f4f6; color: #111827; }
        .typing { color: #6b7280; font-style: italic; margin: 8px 0; display: none; }
        .quick-actions { margin: 15px 0; }
        .quick-actions button { background: white; color: #1f2937; border: 1px solid #d1d5db; }
        .input-row { display: flex; gap: 8px; }
        input { flex: 1; padding: 10px; border: 1px solid #ddd; border-radius: 4px; }
        button { background: #007bff; color: white; padding: 10px 18px; border: none; border-radius: 4px; cursor: pointer; margin: 2px; }
        button:hover { background: #0056b3; color: white; }
        .disclaimer { margin-top: 15px; padding: 12px; background: #eff6ff; border: 1px solid #bfdbfe; border-radius: 8px; font-size: 12px; color: #1e40af; }
    </style>
</head>
<body>
    <div class="container">
        <h1>EduGuard AI Counselor</h1>
        <p>Confidential &middot; Supportive &middot; Available 24/7</p>

        <div id="messages" class="messages"></div>
        <div id="typing" class="typing">Counselor is typing...</div>

        <div id="quick-actions" class="quick-actions"></div>

        <div class="input-row">
            <input id="input" placeholder="Type your message here... I'm here to listen and help." />
            <button onclick="send()">Send</button>
        </div>

        <div class="disclaimer">
            <strong>Remember:</strong> This AI counselor provides support and resources, but is not a replacement for professional mental health services. If you're experiencing a crisis, please contact emergency services or the crisis hotline: 988.
        </div>
    </div>

    <script>
        let sessionId = null;

        function escapeHtml(text) {
            const div = document.createElement('div');
            div.textContent = text;
            return div.innerHTML;
        }

        function render(data) {
            const list = document.getElementById('messages');
            list.innerHTML = data.transcript.map(m => `
                <div class="message ${m.sender}"><div class="bubble">${escapeHtml(m.text)}</div></div>
            `).join('');
            list.scrollTop = list.scrollHeight;
            document.getElementById('typing').style.display =
                data.state === 'awaitingReply' ? 'block' : 'none';
        }

        async function refresh() {
            if (!sessionId) return;
            const response = await fetch(`/sessions/${sessionId}/transcript`);
            if (response.ok) render(await response.json());
        }

        async function start() {
            const name = prompt('What should the counselor call you?') || '';
            const response = await fetch('/sessions', {
                method: 'POST',
                headers: {'Content-Type': 'application/json'},
                body: JSON.stringify({visitorName: name})
            });
            const data = await response.json();
            sessionId = data.sessionId;
            render(data);

            const actions = await (await fetch('/quick-actions')).json();
            document.getElementById('quick-actions').innerHTML = actions.map(a =>
                `<button onclick="quickAction('${a.id}')">${a.label}</button>`
            ).join('');

            setInterval(refresh, 500);
        }

        async function send() {
            const input = document.getElementById('input');
            const text = input.value;
            if (!text.trim()) return;
            input.value = '';
            const response = await fetch(`/sessions/${sessionId}/messages`, {
                method: 'POST',
                headers: {'Content-Type': 'application/json'},
                body: JSON.stringify({text})
            });
            render(await response.json());
        }

        async function quickAction(action) {
            const response = await fetch(`/sessions/${sessionId}/quick-actions`, {
                method: 'POST',
                headers: {'Content-Type': 'application/json'},
                body: JSON.stringify({action})
            });
            render(await response.json());
        }

        document.getElementById('input').addEventListener('keydown', e => {
            if (e.key === 'Enter' && !e.shiftKey) {
                e.preventDefault();
                send();
            }
        });

        window.addEventListener('beforeunload', () => {
            if (sessionId) fetch(`/sessions/${sessionId}`, {method: 'DELETE', keepalive: true});
        });

        start();
    </script>
</body>
</html>
"#;
