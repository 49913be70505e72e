//! Simulated generation backend
//!
//! Canned, keyword-routed responses standing in for a real model API.
//! Useful for demos and offline work: replies are shaped exactly like the
//! real thing and pick up the current file and language from the context
//! window, but no network is involved. Artificial delays mimic a remote
//! round trip and can be zeroed for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::backend::{AiReply, GenerationBackend, InlineSuggestion, RefactoringSuggestion};
use super::context::{kinds, ContextItem};

/// Per-operation artificial delays, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedDelays {
    pub chat_ms: u64,
    pub suggest_ms: u64,
    pub explain_ms: u64,
    pub refactor_ms: u64,
}

impl Default for SimulatedDelays {
    fn default() -> Self {
        Self {
            chat_ms: 1000,
            suggest_ms: 500,
            explain_ms: 800,
            refactor_ms: 1200,
        }
    }
}

impl SimulatedDelays {
    /// No delays; used by tests
    pub fn none() -> Self {
        Self {
            chat_ms: 0,
            suggest_ms: 0,
            explain_ms: 0,
            refactor_ms: 0,
        }
    }
}

/// Offline backend producing canned, context-aware replies
pub struct SimulatedBackend {
    delays: SimulatedDelays,
}

impl SimulatedBackend {
    pub fn new(delays: SimulatedDelays) -> Self {
        Self { delays }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(SimulatedDelays::default())
    }
}

async fn simulate_latency(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Current file name and type as reported by the file-metadata collector
fn current_file_info(context: &[ContextItem]) -> (String, String) {
    let metadata = context.iter().find(|item| item.kind == kinds::FILE_METADATA);
    let file_name = metadata
        .and_then(|m| m.payload.get("file_name"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();
    let file_type = metadata
        .and_then(|m| m.payload.get("file_type"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();
    (file_name, file_type)
}

fn generic_explanation(language: &str) -> &'static str {
    match language {
        "javascript" | "js" => "likely involves manipulating data, handling events, or updating the DOM",
        "css" => "defines styles for HTML elements, including layout, colors, and responsive behavior",
        "html" => "structures content for web pages, defining elements and their relationships",
        "python" | "py" => "processes data, performs calculations, or implements algorithms",
        "java" => "defines classes and methods for object-oriented programming",
        "rust" | "rs" => "manages ownership of data while implementing application logic",
        _ => "implements functionality specific to your application",
    }
}

fn example_reply(language: &str) -> AiReply {
    match language {
        "js" | "javascript" => AiReply::Code {
            message: "Here's a sample JavaScript function:".to_string(),
            language: "javascript".to_string(),
            code: r#"function calculateTotal(items) {
  return items.reduce((total, item) => {
    return total + (item.price * item.quantity);
  }, 0);
}"#
            .to_string(),
        },
        "css" => AiReply::Code {
            message: "Here's a sample CSS snippet for a responsive card design:".to_string(),
            language: "css".to_string(),
            code: r#".card {
  background-color: white;
  border-radius: 8px;
  box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
  padding: 16px;
  transition: transform 0.3s ease;
}

.card:hover {
  transform: translateY(-5px);
}

@media (max-width: 768px) {
  .card {
    padding: 12px;
  }
}"#
            .to_string(),
        },
        "html" => AiReply::Code {
            message: "Here's a sample HTML structure for a contact form:".to_string(),
            language: "html".to_string(),
            code: r#"<form class="contact-form">
  <div class="form-group">
    <label for="name">Name</label>
    <input type="text" id="name" name="name" required>
  </div>

  <div class="form-group">
    <label for="email">Email</label>
    <input type="email" id="email" name="email" required>
  </div>

  <button type="submit" class="submit-button">Send Message</button>
</form>"#
            .to_string(),
        },
        other => AiReply::Text {
            message: format!(
                "I'd be happy to provide an example. What kind of {other} code would you like to see?"
            ),
        },
    }
}

const CANNED_EXPLANATIONS: &[&str] = &[
    "define a function that processes data and returns a transformed result",
    "create a class that encapsulates related functionality and state",
    "implement an algorithm for sorting or searching data efficiently",
    "handle user events and update the UI accordingly",
    "fetch data from an API and process the response",
    "validate user input and provide feedback on errors",
    "manage application state using a pattern like Redux or Context API",
    "optimize performance by memoizing expensive calculations",
];

#[async_trait]
impl GenerationBackend for SimulatedBackend {
    async fn chat(&self, message: &str, context: &[ContextItem]) -> anyhow::Result<AiReply> {
        simulate_latency(self.delays.chat_ms).await;

        let message = message.to_lowercase();
        let (current_file, current_language) = current_file_info(context);

        let reply = if message.contains("hello") || message.contains("hi") {
            AiReply::Text {
                message: format!(
                    "Hello! I see you're working on {current_file}. How can I assist you with your {current_language} code today?"
                ),
            }
        } else if message.contains("help") {
            AiReply::Text {
                message: "I'm here to help! You can ask me about coding problems, request code \
                          examples, or get explanations about programming concepts. I can also \
                          help with refactoring suggestions and debugging."
                    .to_string(),
            }
        } else if message.contains("example") || message.contains("sample") {
            example_reply(&current_language)
        } else if message.contains("explain") || message.contains("how does") {
            let editor = context.iter().find(|item| item.kind == kinds::EDITOR);
            let context_lines = editor
                .and_then(|e| e.payload.get("context_lines"))
                .and_then(|v| v.as_str());
            match context_lines {
                Some(_) => AiReply::Explanation {
                    explanation: format!(
                        "The code you're looking at appears to be {current_language} code that {}.",
                        generic_explanation(&current_language)
                    ),
                },
                None => AiReply::Text {
                    message: "What specific code or concept would you like me to explain?"
                        .to_string(),
                },
            }
        } else if message.contains("refactor") || message.contains("improve") {
            AiReply::Text {
                message: "I'd be happy to suggest some refactoring improvements. Run the \
                          refactor operation on the code in question and I'll propose specific \
                          changes to make it more efficient, readable, or maintainable."
                    .to_string(),
            }
        } else if message.contains("error") || message.contains("bug") || message.contains("fix") {
            AiReply::Text {
                message: "To help debug your code, I'd need to see the error message or \
                          understand the issue you're facing."
                    .to_string(),
            }
        } else if message.contains("thank") {
            AiReply::Text {
                message: "You're welcome! Feel free to ask if you need any more assistance with \
                          your coding."
                    .to_string(),
            }
        } else {
            AiReply::Text {
                message: format!(
                    "I understand you're asking about '{message}'. Ask about your code, request \
                     an example, or ask for an explanation of the current file."
                ),
            }
        };

        Ok(reply)
    }

    async fn inline_suggestions(
        &self,
        _prefix: &str,
        context: &[ContextItem],
    ) -> anyhow::Result<Vec<InlineSuggestion>> {
        simulate_latency(self.delays.suggest_ms).await;

        let (_, language) = current_file_info(context);
        let suggestions = match language.as_str() {
            "javascript" | "js" | "unknown" => vec![
                InlineSuggestion {
                    label: "function".to_string(),
                    insert_text: "function ${1:name}(${2:params}) {\n\t${3}\n}".to_string(),
                    documentation: "Create a new function".to_string(),
                },
                InlineSuggestion {
                    label: "arrow function".to_string(),
                    insert_text: "(${1:params}) => {\n\t${2}\n}".to_string(),
                    documentation: "Create a new arrow function".to_string(),
                },
                InlineSuggestion {
                    label: "class".to_string(),
                    insert_text:
                        "class ${1:Name} {\n\tconstructor(${2:params}) {\n\t\t${3}\n\t}\n}"
                            .to_string(),
                    documentation: "Create a new class".to_string(),
                },
                InlineSuggestion {
                    label: "async function".to_string(),
                    insert_text: "async function ${1:name}(${2:params}) {\n\t${3}\n}".to_string(),
                    documentation: "Create a new async function".to_string(),
                },
                InlineSuggestion {
                    label: "try/catch".to_string(),
                    insert_text: "try {\n\t${1}\n} catch (error) {\n\t${2}\n}".to_string(),
                    documentation: "Create a try/catch block".to_string(),
                },
            ],
            "css" => vec![
                InlineSuggestion {
                    label: "flexbox".to_string(),
                    insert_text:
                        "display: flex;\njustify-content: ${1:center};\nalign-items: ${2:center};"
                            .to_string(),
                    documentation: "Create a flexbox container".to_string(),
                },
                InlineSuggestion {
                    label: "media query".to_string(),
                    insert_text: "@media (max-width: ${1:768px}) {\n\t${2}\n}".to_string(),
                    documentation: "Create a media query for responsive design".to_string(),
                },
                InlineSuggestion {
                    label: "animation".to_string(),
                    insert_text:
                        "@keyframes ${1:name} {\n\t0% {\n\t\t${2}\n\t}\n\t100% {\n\t\t${3}\n\t}\n}"
                            .to_string(),
                    documentation: "Create a CSS animation".to_string(),
                },
            ],
            "html" => vec![
                InlineSuggestion {
                    label: "form".to_string(),
                    insert_text: "<form>\n\t<label for=\"${1:input}\">${2:Label}</label>\n\t<input type=\"${3:text}\" id=\"${1:input}\" name=\"${1:input}\">\n\t<button type=\"submit\">${4:Submit}</button>\n</form>".to_string(),
                    documentation: "Create an HTML form".to_string(),
                },
                InlineSuggestion {
                    label: "table".to_string(),
                    insert_text: "<table>\n\t<thead>\n\t\t<tr>\n\t\t\t<th>${1:Header}</th>\n\t\t</tr>\n\t</thead>\n\t<tbody>\n\t\t<tr>\n\t\t\t<td>${2:Data}</td>\n\t\t</tr>\n\t</tbody>\n</table>".to_string(),
                    documentation: "Create an HTML table".to_string(),
                },
            ],
            _ => Vec::new(),
        };

        Ok(suggestions)
    }

    async fn explain(&self, code: &str, _context: &[ContextItem]) -> anyhow::Result<String> {
        simulate_latency(self.delays.explain_ms).await;

        // Deterministic pick so repeated runs and tests agree
        let canned = CANNED_EXPLANATIONS[code.len() % CANNED_EXPLANATIONS.len()];
        Ok(format!("This code appears to {canned}."))
    }

    async fn refactor(
        &self,
        _code: &str,
        _context: &[ContextItem],
    ) -> anyhow::Result<Vec<RefactoringSuggestion>> {
        simulate_latency(self.delays.refactor_ms).await;

        Ok(vec![
            RefactoringSuggestion {
                title: "Extract Function".to_string(),
                description: "Extract this code block into a separate function to improve \
                              readability and reusability."
                    .to_string(),
                before: "const result = items.map(item => {\n  const price = item.price * (1 - item.discount);\n  const tax = price * 0.08;\n  return price + tax;\n});".to_string(),
                after: "function calculatePriceWithTax(item) {\n  const price = item.price * (1 - item.discount);\n  const tax = price * 0.08;\n  return price + tax;\n}\n\nconst result = items.map(item => calculatePriceWithTax(item));".to_string(),
            },
            RefactoringSuggestion {
                title: "Use Destructuring".to_string(),
                description: "Use object destructuring to make the code more concise and readable."
                    .to_string(),
                before: "function processUser(user) {\n  const name = user.name;\n  const email = user.email;\n  const age = user.age;\n}".to_string(),
                after: "function processUser(user) {\n  const { name, email, age } = user;\n}".to_string(),
            },
            RefactoringSuggestion {
                title: "Replace Loop with Array Method".to_string(),
                description: "Replace imperative loop with declarative array method for cleaner \
                              code."
                    .to_string(),
                before: "const results = [];\nfor (let i = 0; i < items.length; i++) {\n  if (items[i].active) {\n    results.push(items[i].value);\n  }\n}".to_string(),
                after: "const results = items\n  .filter(item => item.active)\n  .map(item => item.value);".to_string(),
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn metadata_item(file_name: &str, file_type: &str) -> ContextItem {
        ContextItem {
            kind: kinds::FILE_METADATA.to_string(),
            payload: json!({"file_name": file_name, "file_type": file_type}),
            timestamp: Utc::now(),
        }
    }

    fn backend() -> SimulatedBackend {
        SimulatedBackend::new(SimulatedDelays::none())
    }

    #[tokio::test]
    async fn greeting_mentions_current_file() {
        let context = vec![metadata_item("app.js", "js")];
        let reply = backend().chat("hello there", &context).await.unwrap();
        match reply {
            AiReply::Text { message } => {
                assert!(message.contains("app.js"));
                assert!(message.contains("js"));
            }
            other => panic!("expected text reply, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn example_request_routes_on_language() {
        let context = vec![metadata_item("style.css", "css")];
        let reply = backend().chat("show me an example", &context).await.unwrap();
        match reply {
            AiReply::Code { language, .. } => assert_eq!(language, "css"),
            other => panic!("expected code reply, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn example_without_known_language_asks_back() {
        let reply = backend().chat("give me a sample", &[]).await.unwrap();
        assert!(matches!(reply, AiReply::Text { .. }));
    }

    #[tokio::test]
    async fn explain_request_uses_editor_context() {
        let context = vec![
            metadata_item("app.js", "javascript"),
            ContextItem {
                kind: kinds::EDITOR.to_string(),
                payload: json!({"context_lines": "const a = 1;"}),
                timestamp: Utc::now(),
            },
        ];
        let reply = backend().chat("explain the current code", &context).await.unwrap();
        match reply {
            AiReply::Explanation { explanation } => {
                assert!(explanation.contains("javascript"));
            }
            other => panic!("expected explanation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn suggestions_follow_file_type() {
        let context = vec![metadata_item("style.css", "css")];
        let suggestions = backend().inline_suggestions("", &context).await.unwrap();
        let labels: Vec<&str> = suggestions.iter().map(|s| s.label.as_str()).collect();
        assert!(labels.contains(&"flexbox"));
        assert!(labels.contains(&"media query"));
    }

    #[tokio::test]
    async fn explanation_is_deterministic() {
        let backend = backend();
        let first = backend.explain("let x = 1;", &[]).await.unwrap();
        let second = backend.explain("let x = 1;", &[]).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn refactor_returns_before_after_pairs() {
        let suggestions = backend().refactor("var x = 1;", &[]).await.unwrap();
        assert_eq!(suggestions.len(), 3);
        for suggestion in &suggestions {
            assert!(!suggestion.before.is_empty());
            assert!(!suggestion.after.is_empty());
        }
    }
}
