//! ESC client: URL construction, request bodies and response decoding over
//! an [`EscTransport`].

use crate::{
    config::EscConfig,
    error::{EscError, EscResult},
    transport::EscTransport,
};
use esc_gates::{
    ChangeGate, ChangeGateConfig, ChangeGateUpdateConfig, decode_gate, decode_gate_list,
    qualified_env_name, request::ENTITY_TYPE_ENVIRONMENT,
};
use esc_values::{Environment, OpenEnvironment, PlainValue, ValueNode};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};
use url::Url;

/// Projected top-level values of an environment.
pub type EnvironmentValues = Map<String, PlainValue>;

/// ESC API client.
pub struct EscClient<T: EscTransport> {
    config: EscConfig,
    base: Url,
    transport: T,
}

impl<T: EscTransport> EscClient<T> {
    /// Create a client over `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`EscError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: EscConfig, transport: T) -> EscResult<Self> {
        config.validate()?;
        let base = Url::parse(&config.server_url())
            .map_err(|e| EscError::invalid_config(format!("server URL: {e}")))?;
        Ok(Self {
            config,
            base,
            transport,
        })
    }

    /// Client configuration.
    #[must_use]
    pub const fn config(&self) -> &EscConfig {
        &self.config
    }

    /// Underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Build an API URL from path segments, percent-encoding each.
    fn endpoint<I>(&self, segments: I) -> EscResult<Url>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| EscError::invalid_config("server URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Open an environment, evaluating it server-side.
    ///
    /// # Errors
    ///
    /// Transport failures and undecodable responses.
    #[instrument(skip(self))]
    pub async fn open_environment(
        &self,
        org: &str,
        project: &str,
        env: &str,
    ) -> EscResult<OpenEnvironment> {
        let url = self.endpoint(["environments", org, project, env, "open"])?;
        self.open(url).await
    }

    /// Open a specific revision or tag of an environment.
    ///
    /// # Errors
    ///
    /// Transport failures and undecodable responses.
    #[instrument(skip(self))]
    pub async fn open_environment_at_version(
        &self,
        org: &str,
        project: &str,
        env: &str,
        version: &str,
    ) -> EscResult<OpenEnvironment> {
        let url = self.endpoint(["environments", org, project, env, "versions", version, "open"])?;
        self.open(url).await
    }

    async fn open(&self, url: Url) -> EscResult<OpenEnvironment> {
        debug!(%url, "Opening environment");
        let body = self.transport.post(url, None).await?;
        if body.is_null() {
            return Err(EscError::empty_response("open environment"));
        }
        let opened: OpenEnvironment = serde_json::from_value(body)?;
        debug!(open_id = %opened.id, "Environment opened");
        Ok(opened)
    }

    /// Read an opened environment, returning the annotated tree and its
    /// projected values.
    ///
    /// # Errors
    ///
    /// Transport failures and malformed value trees.
    #[instrument(skip(self))]
    pub async fn read_open_environment(
        &self,
        org: &str,
        project: &str,
        env: &str,
        open_id: &str,
    ) -> EscResult<(Environment, EnvironmentValues)> {
        let url = self.endpoint(["environments", org, project, env, "open", open_id])?;
        debug!(%url, "Reading open environment");

        let body = self.transport.get(url).await?;
        if body.is_null() {
            return Err(EscError::empty_response("read open environment"));
        }
        let environment = Environment::from_json(&body)?;
        let values = environment.values();
        debug!(properties = environment.properties.len(), "Environment read");
        Ok((environment, values))
    }

    /// Open then read an environment.
    ///
    /// # Errors
    ///
    /// See [`Self::open_environment`] and [`Self::read_open_environment`].
    pub async fn open_and_read_environment(
        &self,
        org: &str,
        project: &str,
        env: &str,
    ) -> EscResult<(Environment, EnvironmentValues)> {
        let opened = self.open_environment(org, project, env).await?;
        self.read_open_environment(org, project, env, &opened.id).await
    }

    /// Open then read a specific revision or tag of an environment.
    ///
    /// # Errors
    ///
    /// See [`Self::open_environment_at_version`] and
    /// [`Self::read_open_environment`].
    pub async fn open_and_read_environment_at_version(
        &self,
        org: &str,
        project: &str,
        env: &str,
        version: &str,
    ) -> EscResult<(Environment, EnvironmentValues)> {
        let opened = self
            .open_environment_at_version(org, project, env, version)
            .await?;
        self.read_open_environment(org, project, env, &opened.id).await
    }

    /// Read one property of an opened environment by dot-separated path.
    ///
    /// The whole environment is fetched and the path is resolved locally.
    ///
    /// # Errors
    ///
    /// Transport failures, malformed trees, and path resolution errors.
    #[instrument(skip(self))]
    pub async fn read_environment_property(
        &self,
        org: &str,
        project: &str,
        env: &str,
        open_id: &str,
        path: &str,
    ) -> EscResult<(ValueNode, PlainValue)> {
        let (environment, _) = self
            .read_open_environment(org, project, env, open_id)
            .await?;
        let node = environment.property(path)?.clone();
        let value = node.to_plain();
        Ok((node, value))
    }

    /// List the change gates on an environment.
    ///
    /// # Errors
    ///
    /// Transport failures and gates that fail to decode.
    #[instrument(skip(self))]
    pub async fn list_environment_change_gates(
        &self,
        org: &str,
        project: &str,
        env: &str,
    ) -> EscResult<Vec<ChangeGate>> {
        let mut url = self.endpoint(["change-gates", org])?;
        url.query_pairs_mut()
            .append_pair("entityType", ENTITY_TYPE_ENVIRONMENT)
            .append_pair("qualifiedName", &qualified_env_name(project, env));
        debug!(%url, "Listing change gates");

        let body = self.transport.get(url).await?;
        let list = decode_gate_list(&body)?;
        debug!(count = list.gates.len(), "Change gates listed");
        Ok(list.gates)
    }

    /// Get a change gate by id.
    ///
    /// # Errors
    ///
    /// Transport failures and gates that fail to decode.
    #[instrument(skip(self))]
    pub async fn get_change_gate(&self, org: &str, gate_id: &str) -> EscResult<ChangeGate> {
        let url = self.endpoint(["change-gates", org, gate_id])?;
        debug!(%url, "Getting change gate");
        let body = self.transport.get(url).await?;
        decode_gate_body(&body, "get change gate")
    }

    /// Create a change gate on `<project>/<env>`.
    ///
    /// # Errors
    ///
    /// Invalid configs, transport failures, and undecodable responses.
    #[instrument(skip(self, config), fields(gate_name = %config.name))]
    pub async fn create_environment_change_gate(
        &self,
        org: &str,
        project: &str,
        env: &str,
        config: &ChangeGateConfig,
    ) -> EscResult<ChangeGate> {
        let request = config.to_create_request(project, env)?;
        let body = serde_json::to_value(&request)?;
        let url = self.endpoint(["change-gates", org])?;

        let response = self.transport.post(url, Some(body)).await?;
        let gate = decode_gate_body(&response, "create change gate")?;
        info!(
            gate_id = %gate.id,
            qualified_name = %request.target.qualified_name,
            approvers = gate.rule.eligible_approvers.len(),
            "Change gate created"
        );
        Ok(gate)
    }

    /// Replace a change gate's name, state and rule.
    ///
    /// # Errors
    ///
    /// Invalid configs, transport failures, and undecodable responses.
    #[instrument(skip(self, config), fields(gate_name = %config.name))]
    pub async fn update_change_gate(
        &self,
        org: &str,
        gate_id: &str,
        config: &ChangeGateUpdateConfig,
    ) -> EscResult<ChangeGate> {
        let request = config.to_update_request()?;
        let body = serde_json::to_value(&request)?;
        let url = self.endpoint(["change-gates", org, gate_id])?;

        let response = self.transport.put(url, body).await?;
        let gate = decode_gate_body(&response, "update change gate")?;
        info!(gate_id = %gate.id, enabled = gate.enabled, "Change gate updated");
        Ok(gate)
    }

    /// Delete a change gate.
    ///
    /// # Errors
    ///
    /// Transport failures.
    #[instrument(skip(self))]
    pub async fn delete_change_gate(&self, org: &str, gate_id: &str) -> EscResult<()> {
        let url = self.endpoint(["change-gates", org, gate_id])?;
        self.transport.delete(url).await?;
        info!(gate_id, "Change gate deleted");
        Ok(())
    }
}

fn decode_gate_body(body: &Value, operation: &str) -> EscResult<ChangeGate> {
    if body.is_null() {
        return Err(EscError::empty_response(operation));
    }
    Ok(decode_gate(body)?)
}
