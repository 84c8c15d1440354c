use rand::prelude::SliceRandom;
use serde::{Deserialize, Serialize};

/// How aggressively the Chrome session suppresses automation signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HardeningProfile {
    /// Plain session: window size, log level, and user agent only.
    Minimal,
    /// Adds automation-flag suppression and JS evasions after navigation.
    Hardened,
}

/// One plausible desktop identity for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub user_agent: String,
    pub viewport: (u32, u32),
    pub languages: Vec<String>,
}

/// Small pool of desktop identities; one is picked per browser session and
/// kept for its lifetime.
#[derive(Debug, Clone)]
pub struct AgentPool {
    profiles: Vec<AgentProfile>,
    session_pick: Option<AgentProfile>,
}

impl AgentPool {
    pub fn new() -> Self {
        Self {
            profiles: vec![
                AgentProfile {
                    user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
                    viewport: (1920, 1080),
                    languages: vec!["en-US".to_string(), "en".to_string()],
                },
                AgentProfile {
                    user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
                    viewport: (1440, 900),
                    languages: vec!["en-US".to_string(), "en".to_string()],
                },
                AgentProfile {
                    user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
                    viewport: (1920, 1080),
                    languages: vec!["en-US".to_string(), "en".to_string()],
                },
            ],
            session_pick: None,
        }
    }

    /// Get (or lazily select) the identity for the current session.
    pub fn session_profile(&mut self) -> &AgentProfile {
        if self.session_pick.is_none() {
            let mut rng = rand::thread_rng();
            let p = self.profiles.choose(&mut rng).cloned();
            self.session_pick = p;
        }
        // the pool is never empty
        self.session_pick.as_ref().unwrap_or(&self.profiles[0])
    }
}

impl Default for AgentPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Construct Chrome command-line arguments for a profile and identity.
pub fn build_chrome_arguments(profile: &HardeningProfile, agent: &AgentProfile) -> Vec<String> {
    let mut args = vec![
        "--log-level=3".to_string(),
        format!("--user-agent={}", agent.user_agent),
        format!("--window-size={},{}", agent.viewport.0, agent.viewport.1),
        format!("--lang={}", agent.languages.join(",")),
    ];
    if let HardeningProfile::Hardened = profile {
        args.extend([
            "--disable-blink-features=AutomationControlled".to_string(),
            "--disable-infobars".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--no-sandbox".to_string(),
            "--disable-extensions".to_string(),
        ]);
    }
    args
}

/// JavaScript evasions applied after navigation for hardened sessions.
pub struct EvasionScripts;

impl EvasionScripts {
    pub fn core() -> &'static str {
        r#"
            Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
            Object.defineProperty(navigator, 'plugins', { get: () => [1,2,3] });
            Object.defineProperty(navigator, 'languages', {
                get: () => ['en-US', 'en']
            });
            if (!window.chrome) window.chrome = { runtime: {} };
        "#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_arguments_carry_identity_only() {
        let mut pool = AgentPool::new();
        let agent = pool.session_profile().clone();
        let args = build_chrome_arguments(&HardeningProfile::Minimal, &agent);

        assert!(args.iter().any(|a| a.starts_with("--user-agent=")));
        assert!(args.iter().any(|a| a.starts_with("--window-size=")));
        assert!(!args.iter().any(|a| a.contains("AutomationControlled")));
    }

    #[test]
    fn hardened_arguments_suppress_automation_flags() {
        let mut pool = AgentPool::new();
        let agent = pool.session_profile().clone();
        let args = build_chrome_arguments(&HardeningProfile::Hardened, &agent);

        assert!(args.iter().any(|a| a.contains("AutomationControlled")));
        assert!(args.iter().any(|a| a == "--disable-extensions"));
    }

    #[test]
    fn session_profile_is_stable_within_a_session() {
        let mut pool = AgentPool::new();
        let first = pool.session_profile().user_agent.clone();
        let second = pool.session_profile().user_agent.clone();
        assert_eq!(first, second);
    }
}
