use colored::Colorize;
use serde_json::{json, Value};

use super::Scenario;
use crate::api::{self, Session};
use crate::client::{ApiTransport, Dispatch};
use crate::identity::{premium_device_id, AccountIdentity, IdentityGenerator};
use crate::report::Reporter;
use crate::utils::config::HarnessConfig;
use crate::utils::document::TestDocument;

/// Drives the plan-limit scenarios against one backend, strictly in sequence.
pub struct ScenarioRunner<'a> {
    transport: &'a dyn ApiTransport,
    identity: &'a dyn IdentityGenerator,
    config: &'a HarnessConfig,
    document: TestDocument,
    reporter: Reporter,
}

/// Outcome of the premium authentication chain
struct PremiumAuth {
    session: Session,
    via: String,
}

impl<'a> ScenarioRunner<'a> {
    pub fn new(
        transport: &'a dyn ApiTransport,
        identity: &'a dyn IdentityGenerator,
        config: &'a HarnessConfig,
    ) -> Self {
        Self {
            transport,
            identity,
            config,
            document: TestDocument::new(&config.document_path),
            reporter: Reporter::new(),
        }
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn into_reporter(self) -> Reporter {
        self.reporter
    }

    /// Run the selected scenarios in their fixed order. The free account is
    /// created once and shared by both free-tier scenarios.
    pub async fn run(&mut self, scenarios: &[Scenario]) {
        let wants = |s: Scenario| scenarios.contains(&s);

        if wants(Scenario::FreeAnalysis) || wants(Scenario::ProjectUpload) {
            println!("\n{} Testing Free Account Document Analysis Limits...", "🔍".blue());
            let session = self.create_free_account().await;

            if wants(Scenario::FreeAnalysis) {
                self.document_analysis_quota(session.as_ref()).await;
            }
            if wants(Scenario::ProjectUpload) {
                self.project_upload_quota(session.as_ref()).await;
            }
        }

        if wants(Scenario::Premium) {
            self.premium_unlimited().await;
        }
    }

    /// Register a fresh free account and check its default plan.
    pub async fn create_free_account(&mut self) -> Option<Session> {
        let stamp = self.identity.stamp();
        let identity = AccountIdentity::free(stamp, &self.config.account_password);

        let dispatch = self
            .transport
            .send(api::register_request(&identity))
            .await;

        let session = Session::from_auth(
            &identity.email,
            &identity.password,
            &identity.device_id,
            &dispatch,
        );

        let Some(session) = session else {
            self.reporter.record(
                "Create free account for testing",
                false,
                format!("Failed to create free account ({})", dispatch.status_label()),
                dispatch.into_body(),
            );
            return None;
        };

        self.reporter.record(
            "Create free account for testing",
            true,
            format!("Account created: {}", session.email),
            Some(json!({"email": session.email, "plan": session.plan_or_unknown()})),
        );

        let free_plan = &self.config.plans.free;
        self.reporter.record(
            "Verify account has free plan",
            session.has_plan(free_plan),
            format!("Plan: {}", session.plan_or_unknown()),
            Some(json!({"plan": session.plan()})),
        );

        Some(session)
    }

    /// One analysis must pass; the next one must hit the daily quota with a
    /// 403, not a 500.
    pub async fn document_analysis_quota(&mut self, session: Option<&Session>) {
        let Some(session) = session else {
            self.skip("Document analysis quota test skipped", "No free account session available");
            return;
        };

        println!("\n{} Testing first document analysis (should succeed)...", "📄".blue());
        let first = self.analyze(&session.access_token).await;
        self.reporter.record(
            "First document analysis (should succeed)",
            first.is_status(200),
            first.status_label(),
            first.into_body(),
        );

        println!("\n{} Testing second document analysis (should fail with 403)...", "📄".blue());
        let second = self.analyze(&session.access_token).await;

        let is_403 = second.is_status(403);
        let phrase = &self.config.limits.analysis_limit_phrase;
        let has_correct_message = second.detail_contains(phrase);

        let mut details = format!("Status: {}, Expected: 403", second.status_or_error());
        if second.is_status(500) {
            details.push_str(" (server error instead of plan-limit rejection)");
        }
        let message = second.detail().unwrap_or_default().to_string();

        self.reporter.record(
            "Second analysis returns 403 (not 500)",
            is_403,
            details,
            second.into_body(),
        );
        self.reporter.record(
            "Error message is correct for plan limits",
            has_correct_message,
            format!("Message contains limit info: {}", has_correct_message),
            Some(json!({ "message": message })),
        );
    }

    /// Upload until the free-tier project limit rejects us. Returns the number
    /// of upload attempts made.
    pub async fn project_upload_quota(&mut self, session: Option<&Session>) -> u32 {
        let Some(session) = session else {
            self.skip("Project upload quota test skipped", "No free account session available");
            return 0;
        };

        println!("\n{} Testing Project Upload Limits...", "🔍".blue());

        let limit = self.config.limits.free_upload_limit;
        let max_attempts = self.config.limits.upload_max_attempts;
        let phrase = self.config.limits.upload_limit_phrase.clone();
        let mut attempts = 0;

        for index in 0..max_attempts {
            let dispatch = self.upload(index, &session.access_token).await;
            attempts += 1;

            if index < limit {
                self.reporter.record(
                    format!("Project upload {}/{} (should succeed)", index + 1, limit),
                    dispatch.is_status(200),
                    dispatch.status_label(),
                    dispatch.into_body(),
                );
                continue;
            }

            let expected_403 = dispatch.is_status(403);
            let has_limit_message = dispatch.body_contains(&phrase);
            self.reporter.record(
                format!("Project upload {} (should fail with 403)", index + 1),
                expected_403 && has_limit_message,
                format!(
                    "Status: {}, Has limit message: {}",
                    dispatch.status_or_error(),
                    has_limit_message
                ),
                dispatch.into_body(),
            );

            if expected_403 {
                break;
            }
        }

        attempts
    }

    /// Authenticate the premium fixture and check that repeated analyses are
    /// never rejected.
    pub async fn premium_unlimited(&mut self) {
        println!(
            "\n{} Testing Premium Account ({})...",
            "🔍".blue(),
            self.config.premium.email.cyan()
        );

        let auth = match self.authenticate_premium().await {
            Ok(auth) => auth,
            Err(attempts) => {
                let last = attempts
                    .last()
                    .and_then(|attempt| attempt["result"].as_str())
                    .unwrap_or("no attempt made");
                let details = format!(
                    "Could not authenticate premium account ({}) - check premium.email/premium.password",
                    last
                );
                self.reporter.record(
                    "Login with premium account",
                    false,
                    details,
                    Some(json!({ "email": self.config.premium.email, "attempts": attempts })),
                );
                self.skip("Premium analyses skipped", "No premium session available");
                return;
            }
        };

        let session = auth.session;
        self.reporter.record(
            "Login with premium account",
            true,
            format!("Premium account authenticated ({})", auth.via),
            Some(json!({"email": session.email, "plan": session.plan()})),
        );

        let premium_plan = self.config.plans.premium.clone();
        let is_premium = session.has_plan(&premium_plan);
        self.reporter.record(
            "Verify premium plan status",
            is_premium,
            format!("Plan: {}", session.plan_or_unknown()),
            Some(json!({"plan": session.plan()})),
        );

        if !is_premium {
            self.skip(
                "Premium analyses skipped",
                &format!(
                    "Account plan is '{}', expected '{}'",
                    session.plan_or_unknown(),
                    premium_plan
                ),
            );
            return;
        }

        println!("\n{} Testing multiple document analyses with premium account...", "📄".blue());
        let count = self.config.limits.premium_analysis_count;
        for i in 1..=count {
            let dispatch = self.analyze(&session.access_token).await;
            self.reporter.record(
                format!("Premium account analysis {}/{} (should succeed)", i, count),
                dispatch.is_status(200),
                dispatch.status_label(),
                dispatch.into_body(),
            );
        }
    }

    /// Login with the fixture, then (if allowed) register the fixture, then
    /// register a fresh premium-pattern account. Every attempt's outcome is
    /// kept for the login record.
    async fn authenticate_premium(&self) -> Result<PremiumAuth, Vec<Value>> {
        let fixture = &self.config.premium;
        let stamp = self.identity.stamp();
        let device_id = premium_device_id(stamp);
        let mut attempts = Vec::new();

        let dispatch = self
            .transport
            .send(api::login_request(&fixture.email, &fixture.password, &device_id))
            .await;
        if let Some(session) =
            Session::from_auth(&fixture.email, &fixture.password, &device_id, &dispatch)
        {
            return Ok(PremiumAuth {
                session,
                via: "login".to_string(),
            });
        }
        log::info!("premium login failed: {}", dispatch.status_label());
        attempts.push(json!({"step": "login", "result": dispatch.status_label(), "body": dispatch.body()}));

        if !fixture.register_fallback {
            return Err(attempts);
        }

        let candidates = [
            ("registered fixture account", AccountIdentity::premium_fixture(&fixture.email, &fixture.password, stamp)),
            ("registered fresh account", AccountIdentity::fresh_premium(stamp, &fixture.password)),
        ];

        for (via, identity) in candidates {
            println!("  {} Trying fallback: {}...", "↻".yellow(), identity.email);
            let dispatch = self.transport.send(api::register_request(&identity)).await;
            if let Some(session) = Session::from_auth(
                &identity.email,
                &identity.password,
                &identity.device_id,
                &dispatch,
            ) {
                return Ok(PremiumAuth {
                    session,
                    via: format!("{} {}", via, identity.email),
                });
            }
            log::info!("premium fallback register {} failed: {}", identity.email, dispatch.status_label());
            attempts.push(json!({
                "step": format!("register {}", identity.email),
                "result": dispatch.status_label(),
                "body": dispatch.body(),
            }));
        }

        Err(attempts)
    }

    async fn analyze(&self, token: &str) -> Dispatch {
        match self.document.read() {
            Ok(bytes) => {
                self.transport
                    .send(api::analyze_document_request(bytes, token))
                    .await
            }
            Err(message) => Dispatch::failed(message),
        }
    }

    async fn upload(&self, index: u32, token: &str) -> Dispatch {
        match self.document.read() {
            Ok(bytes) => {
                self.transport
                    .send(api::project_upload_request(index, bytes, token))
                    .await
            }
            Err(message) => Dispatch::failed(message),
        }
    }

    fn skip(&mut self, name: &str, reason: &str) {
        self.reporter.record(name, false, reason, None);
    }
}
