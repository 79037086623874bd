//! Reusable prompt templates

use crate::mcp::protocol::{GetPromptResult, Prompt, PromptArgument, ServerCapabilities, ServerInfo};
use crate::mcp::service::{capabilities, prompt_arg, McpService};
use crate::types::{HandsOnError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};

pub(crate) fn write_email_prompt() -> Prompt {
    Prompt {
        name: "write_email".to_string(),
        description: Some("Draft a business email".to_string()),
        arguments: vec![
            PromptArgument::new("recipient", "Who the email is for (e.g. Mr. Tanaka)", true),
            PromptArgument::new("subject", "Subject line", true),
            PromptArgument::new("tone", "Tone of voice (formal/casual)", false),
        ],
    }
}

pub(crate) fn write_email(arguments: &Map<String, Value>) -> GetPromptResult {
    let recipient = prompt_arg(arguments, "recipient", "the recipient");
    let subject = prompt_arg(arguments, "subject", "(no subject)");
    let tone = prompt_arg(arguments, "tone", "formal");

    let tone_instructions = if tone == "formal" {
        "Use polite, formal language that follows business etiquette."
    } else {
        "Write in a casual, friendly tone."
    };

    GetPromptResult::user(format!(
        "Write a business email to {}.\n\n\
         Subject: {}\n\n\
         Requirements:\n\
         - {}\n\
         - Include an appropriate greeting and closing\n\
         - Organize the key points as a bulleted list",
        recipient, subject, tone_instructions
    ))
}

fn code_review(arguments: &Map<String, Value>) -> GetPromptResult {
    let language = prompt_arg(arguments, "language", "JavaScript");
    let focus = prompt_arg(arguments, "focus", "general quality");

    GetPromptResult::user(format!(
        "Please review the following {} code.\n\n\
         Review focus: {}\n\n\
         Evaluate it from these angles:\n\
         1. Code quality and readability\n\
         2. Improvements related to {}\n\
         3. Adherence to best practices\n\
         4. Concrete suggestions for improvement\n\n\
         Keep the feedback constructive and kind.",
        language, focus, focus
    ))
}

fn summarize_article(arguments: &Map<String, Value>) -> GetPromptResult {
    let length_instructions = match prompt_arg(arguments, "length", "medium") {
        "short" => "concisely, in 3-5 sentences",
        "long" => "in detail, split into paragraphs",
        _ => "in one or two paragraphs",
    };

    GetPromptResult::user(format!(
        "Summarize the article.\n\n\
         Summary length: {}\n\n\
         Requirements:\n\
         - Cover every main point\n\
         - Structure it so it is easy to follow\n\
         - Keep the important keywords",
        length_instructions
    ))
}

pub struct PromptTemplateServer;

#[async_trait]
impl McpService for PromptTemplateServer {
    fn info(&self) -> ServerInfo {
        ServerInfo::new("prompt-templates-server", "1.0.0")
    }

    fn capabilities(&self) -> ServerCapabilities {
        capabilities(false, false, true)
    }

    fn prompts(&self) -> Vec<Prompt> {
        vec![
            write_email_prompt(),
            Prompt {
                name: "code_review".to_string(),
                description: Some("Generate code review comments".to_string()),
                arguments: vec![
                    PromptArgument::new("language", "Programming language", true),
                    PromptArgument::new("focus", "Review focus (e.g. security, performance)", false),
                ],
            },
            Prompt {
                name: "summarize_article".to_string(),
                description: Some("Summarize an article".to_string()),
                arguments: vec![PromptArgument::new(
                    "length",
                    "Summary length (short/medium/long)",
                    false,
                )],
            },
        ]
    }

    async fn get_prompt(&self, name: &str, arguments: &Map<String, Value>) -> Result<GetPromptResult> {
        match name {
            "write_email" => Ok(write_email(arguments)),
            "code_review" => Ok(code_review(arguments)),
            "summarize_article" => Ok(summarize_article(arguments)),
            _ => Err(HandsOnError::UnknownPrompt(name.to_string())),
        }
    }
}
