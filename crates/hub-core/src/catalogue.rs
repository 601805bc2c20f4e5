//! Seed catalogue and site copy for the home sections.
//!
//! The store seeds these listings on first open so a fresh hub has something to
//! browse. They are owned by the studio account [`STUDIO_OWNER_ID`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::Project;
use crate::enums::ProjectStatus;

pub const STUDIO_OWNER_ID: &str = "studio";

pub const SITE_NAME: &str = "AfroTech Hub";
pub const SITE_ROLE: &str = "Innovative App Development Studio";
pub const SITE_BIO: &str = "We build scalable, high-performance web and mobile applications with a focus on intuitive UI/UX and cutting-edge AI integration.";

/// A contact channel listed in the contact section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    pub platform: &'static str,
    pub url: &'static str,
}

pub const SOCIALS: &[SocialLink] = &[
    SocialLink { platform: "GitHub", url: "https://github.com" },
    SocialLink { platform: "LinkedIn", url: "https://linkedin.com" },
    SocialLink { platform: "Twitter", url: "https://twitter.com" },
    SocialLink { platform: "Email", url: "mailto:hello@example.com" },
];

struct Seed {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    image_url: &'static str,
    tags: &'static [&'static str],
    featured: bool,
    status: ProjectStatus,
    category: &'static str,
    version: &'static str,
    downloads: u64,
    rating: f32,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "app-00000001",
        title: "Nebula Dashboard",
        description: "A real-time analytics platform for SaaS businesses, featuring customizable widgets and AI-driven insights.",
        image_url: "https://picsum.photos/800/600?random=1",
        tags: &["React", "TypeScript", "D3.js", "Node.js"],
        featured: true,
        status: ProjectStatus::Published,
        category: "Business",
        version: "2.1.0",
        downloads: 12_540,
        rating: 4.8,
    },
    Seed {
        id: "app-00000002",
        title: "Gemini Lens",
        description: "An AI-powered image analysis tool that helps users identify objects and generate creative captions instantly.",
        image_url: "https://picsum.photos/800/600?random=2",
        tags: &["Next.js", "Gemini API", "Tailwind"],
        featured: true,
        status: ProjectStatus::Published,
        category: "Productivity",
        version: "1.0.5",
        downloads: 8_200,
        rating: 4.9,
    },
    Seed {
        id: "app-00000003",
        title: "FlowState Task",
        description: "A productivity app designed for deep work, integrating Pomodoro techniques with ambient soundscapes.",
        image_url: "https://picsum.photos/800/600?random=3",
        tags: &["React Native", "Redux", "Firebase"],
        featured: false,
        status: ProjectStatus::InReview,
        category: "Productivity",
        version: "0.9.0",
        downloads: 150,
        rating: 0.0,
    },
    Seed {
        id: "app-00000004",
        title: "CryptoWatch",
        description: "Live cryptocurrency tracker with price alerts and portfolio management features.",
        image_url: "https://picsum.photos/800/600?random=4",
        tags: &["Vue.js", "WebSockets", "Chart.js"],
        featured: false,
        status: ProjectStatus::Published,
        category: "Finance",
        version: "1.2.0",
        downloads: 3_500,
        rating: 4.2,
    },
];

/// The showcase listings, stamped with `now`.
#[must_use]
pub fn seed_projects(now: DateTime<Utc>) -> Vec<Project> {
    SEEDS
        .iter()
        .map(|seed| Project {
            id: seed.id.to_string(),
            owner_id: STUDIO_OWNER_ID.to_string(),
            title: seed.title.to_string(),
            description: seed.description.to_string(),
            image_url: Some(seed.image_url.to_string()),
            tags: seed.tags.iter().map(|t| (*t).to_string()).collect(),
            demo_url: None,
            repo_url: None,
            featured: seed.featured,
            status: seed.status,
            category: seed.category.to_string(),
            version: seed.version.to_string(),
            downloads: seed.downloads,
            rating: seed.rating,
            created_at: now,
            updated_at: now,
        })
        .collect()
}
