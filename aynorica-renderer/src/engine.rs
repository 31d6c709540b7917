//! Tera rendering engine: [`NetworkRenderer`].

use tera::Tera;

use aynorica_core::{NodeId, Registry};

use crate::context::NetworkContext;
use crate::error::RenderError;

const NETWORK_TEMPLATE: &str = "network/network.md.tera";

// Embedded at compile time.
const TPLS: &[(&str, &str)] = &[(NETWORK_TEMPLATE, include_str!("templates/network.md.tera"))];

fn build_tera() -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TPLS.iter().copied())?;
    Ok(tera)
}

/// Renders the Markdown network report.
///
/// Create once with [`NetworkRenderer::new`] and reuse.
pub struct NetworkRenderer {
    tera: Tera,
}

impl NetworkRenderer {
    pub fn new() -> Result<Self, RenderError> {
        Ok(NetworkRenderer { tera: build_tera()? })
    }

    /// Header with node count and prime node, then one block per node in
    /// registry order.
    pub fn render(
        &self,
        registry: &Registry,
        current: Option<&NodeId>,
    ) -> Result<String, RenderError> {
        let ctx = NetworkContext::build(registry, current);
        self.render_with_context(&ctx)
    }

    /// Render using a caller-provided [`NetworkContext`].
    pub fn render_with_context(&self, ctx: &NetworkContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        Ok(self.tera.render(NETWORK_TEMPLATE, &tera_ctx)?)
    }
}

/// One-shot convenience around [`NetworkRenderer`].
pub fn render_network(
    registry: &Registry,
    current: Option<&NodeId>,
) -> Result<String, RenderError> {
    NetworkRenderer::new()?.render(registry, current)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        serde_json::from_str(
            r#"{
                "primeNode": "prime",
                "nodes": {
                    "prime":  { "branch": "main", "parent": null, "children": ["nestjs"],
                                "status": "active", "description": "Root brain",
                                "lastSync": "2025-06-01T10:00:00Z" },
                    "nestjs": { "branch": "node/nestjs", "parent": "prime", "children": [],
                                "status": "active", "description": "NestJS specialist",
                                "lastSync": "2025-06-02T10:00:00Z" }
                }
            }"#,
        )
        .expect("registry")
    }

    #[test]
    fn renderer_new_succeeds() {
        NetworkRenderer::new().expect("embedded template should compile");
    }

    #[test]
    fn exact_report_for_two_nodes() {
        let out = render_network(&registry(), Some(&NodeId::from("nestjs"))).unwrap();
        let expected = "# Aynorica Network\n\n\
**Total Nodes:** 2\n\
**Prime Node:** prime\n\n\
---\n\n\
📦 **prime**\n\
  - **Branch:** main\n\
  - **Parent:** None (root)\n\
  - **Children:** nestjs\n\
  - **Status:** active\n\
  - **Description:** Root brain\n\
  - **Last Sync:** 2025-06-01T10:00:00Z\n\n\
📍 **nestjs** ← YOU ARE HERE\n\
  - **Branch:** node/nestjs\n\
  - **Parent:** prime\n\
  - **Children:** None\n\
  - **Status:** active\n\
  - **Description:** NestJS specialist\n\
  - **Last Sync:** 2025-06-02T10:00:00Z\n\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn no_current_node_means_no_here_marker() {
        let out = render_network(&registry(), None).unwrap();
        assert!(!out.contains("YOU ARE HERE"));
        assert!(out.contains("📄 **nestjs**"));
    }

    #[test]
    fn html_like_text_is_not_escaped() {
        let mut reg = registry();
        reg.nodes[0].description = "<b>&</b>".into();
        let out = render_network(&reg, None).unwrap();
        assert!(out.contains("**Description:** <b>&</b>"));
    }

    #[test]
    fn no_crlf_in_rendered_output() {
        let out = render_network(&registry(), None).unwrap();
        assert!(!out.contains('\r'));
    }
}
