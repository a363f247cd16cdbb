//! Static portfolio content and the shared context every page renders with.
//!
//! Everything here is `'static` and read-only: the collections are compiled
//! into the binary and never change while the process runs.

use chrono::{Datelike, Local};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct Project {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub thumbnail: &'static str,
    pub link: &'static str,
    pub date: &'static str,
    pub tags: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct Certification {
    pub id: u32,
    pub title: &'static str,
    pub organization: &'static str,
    pub date: &'static str,
    pub credential_id: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct Experience {
    pub id: u32,
    pub role: &'static str,
    pub company: &'static str,
    pub dates: &'static str,
    pub summary: &'static str,
}

pub static PROJECTS: &[Project] = &[
    Project {
        id: 1,
        title: "Tideline",
        description: "Offline-first tide and weather dashboard for coastal kayakers, synced over a tiny CRDT log.",
        thumbnail: "/static/img/projects/tideline.png",
        link: "https://github.com/folio-dev/tideline",
        date: "2025",
        tags: &["rust", "wasm", "crdt"],
    },
    Project {
        id: 2,
        title: "Ledgerlite",
        description: "Plain-text double-entry bookkeeping with a terminal UI and monthly PDF statements.",
        thumbnail: "/static/img/projects/ledgerlite.png",
        link: "https://github.com/folio-dev/ledgerlite",
        date: "2024",
        tags: &["rust", "cli", "finance"],
    },
    Project {
        id: 3,
        title: "Harbor Metrics",
        description: "Prometheus exporter and Grafana boards for a fleet of small container hosts.",
        thumbnail: "/static/img/projects/harbor.png",
        link: "https://github.com/folio-dev/harbor-metrics",
        date: "2023",
        tags: &["observability", "go", "grafana"],
    },
];

pub static CERTIFICATIONS: &[Certification] = &[
    Certification {
        id: 1,
        title: "Certified Kubernetes Application Developer",
        organization: "The Linux Foundation",
        date: "March 2025",
        credential_id: "LF-CKAD-2503-1187",
    },
    Certification {
        id: 2,
        title: "AWS Certified Solutions Architect – Associate",
        organization: "Amazon Web Services",
        date: "September 2024",
        credential_id: "AWS-SAA-C03-77410",
    },
];

pub static EXPERIENCE: &[Experience] = &[
    Experience {
        id: 1,
        role: "Senior Backend Engineer",
        company: "Northwind Logistics",
        dates: "2023 – Present",
        summary: "Own the shipment-tracking API; moved hot paths from Python to Rust and cut p99 latency by two thirds.",
    },
    Experience {
        id: 2,
        role: "Software Engineer",
        company: "Brightleaf Health",
        dates: "2020 – 2023",
        summary: "Built HL7 ingestion pipelines and the on-call tooling around them.",
    },
    Experience {
        id: 3,
        role: "Engineering Intern",
        company: "Cobalt Labs",
        dates: "Summer 2019",
        summary: "Shipped the first version of an internal feature-flag service.",
    },
];

/// The content collections a site renders.
#[derive(Clone, Copy, Debug)]
pub struct Content {
    pub projects: &'static [Project],
    pub certifications: &'static [Certification],
    pub experience: &'static [Experience],
}

/// Keys available to every page template.
#[derive(Clone, Debug, Serialize)]
pub struct SharedContext {
    pub projects: &'static [Project],
    pub certifications: &'static [Certification],
    pub experience: &'static [Experience],
    pub current_year: i32,
}

impl Content {
    /// The collections compiled into this binary.
    pub fn builtin() -> Self {
        Self {
            projects: PROJECTS,
            certifications: CERTIFICATIONS,
            experience: EXPERIENCE,
        }
    }

    /// Builds the shared context. `current_year` is read from the local
    /// wall-clock on every call.
    pub fn shared_context(&self) -> SharedContext {
        SharedContext {
            projects: self.projects,
            certifications: self.certifications,
            experience: self.experience,
            current_year: Local::now().year(),
        }
    }
}

impl Default for Content {
    fn default() -> Self { Self::builtin() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn context_has_every_key() {
        let ctx = serde_json::to_value(Content::builtin().shared_context()).unwrap();
        for key in ["projects", "certifications", "experience", "current_year"] {
            assert!(ctx.get(key).is_some(), "missing `{key}`");
        }
        assert_eq!(ctx["projects"][0]["title"], "Tideline");
        assert_eq!(ctx["certifications"][0]["credential_id"], "LF-CKAD-2503-1187");
    }

    #[test]
    fn current_year_tracks_the_clock() {
        let before = Local::now().year();
        let year = Content::builtin().shared_context().current_year;
        let after = Local::now().year();
        assert!(year == before || year == after);
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = PROJECTS.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), PROJECTS.len());
        let ids: HashSet<_> = EXPERIENCE.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), EXPERIENCE.len());
    }

    #[test]
    fn tags_do_not_repeat_within_a_project() {
        for project in PROJECTS {
            let tags: HashSet<_> = project.tags.iter().collect();
            assert_eq!(tags.len(), project.tags.len(), "{}", project.title);
        }
    }
}
