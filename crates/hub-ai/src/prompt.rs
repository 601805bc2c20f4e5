//! Prompt text for the site assistant.

use std::fmt::Write;

use hub_config::GeneralConfig;
use hub_core::entities::Project;

/// Persona and ground truth for the chat assistant: the business profile and
/// the published catalogue.
#[must_use]
pub fn system_instruction(general: &GeneralConfig, projects: &[Project]) -> String {
    let name = &general.site_name;
    let mut catalogue = String::new();
    for project in projects.iter().filter(|p| p.is_published()) {
        let _ = writeln!(
            catalogue,
            "- {}: {} (Tech: {})",
            project.title,
            project.description,
            project.tags.join(", ")
        );
    }

    format!(
        "You are an AI assistant for {name}.\n\
         Your goal is to answer questions about {name}'s applications and services based on the following information:\n\
         \n\
         Name: {name}\n\
         Role: {role}\n\
         Bio: {bio}\n\
         \n\
         Projects (Our Apps):\n\
         {catalogue}\n\
         Guidelines:\n\
         1. Be professional, friendly, and concise.\n\
         2. Refer to {name} as \"we\" or \"the hub\".\n\
         3. Only answer questions related to {name}'s apps, technology, and services.\n\
         4. If asked about contact info, refer them to the contact section or the email provided.\n\
         5. If asked something outside this scope, politely decline and steer the conversation back to our apps.\n",
        role = general.site_role,
        bio = general.site_bio,
    )
}

/// Prompt asking for a short inquiry message about `topic`.
#[must_use]
pub fn contact_draft_prompt(site_name: &str, topic: &str) -> String {
    format!(
        "You are a professional communication assistant.\n\
         Draft a concise, professional inquiry message for a client who wants to contact \"{site_name}\".\n\
         The client's intent is: \"{topic}\".\n\
         Keep it under 100 words.\n\
         Do not include placeholders like [Your Name]. Just write the body of the message.\n",
        topic = topic.trim()
    )
}
