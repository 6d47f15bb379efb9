//! Access-control list service.

use crate::convert;
use crate::domain::{AclInfo, AclRule};
use crate::error::{map_remote, CoreError};
use dpctl_client::Client;
use dpctl_wire::acl::{
    AclAddReplace, AclAddReplaceReply, AclDel, AclDelReply, AclDetails, AclDump, ANY_ACL,
};

pub struct AclService {
    client: Client,
}

impl AclService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates an ACL and returns its index. An ACL must carry at least
    /// one rule.
    pub async fn create(&self, name: &str, rules: &[AclRule]) -> Result<u32, CoreError> {
        if rules.is_empty() {
            return Err(CoreError::InvalidInput {
                reason: "acl must contain at least one rule".into(),
            });
        }

        let reply: AclAddReplaceReply = self
            .client
            .call(AclAddReplace {
                acl_index: ANY_ACL,
                tag: name.to_string(),
                rules: convert::acl_rules_to_wire(rules),
            })
            .await
            .map_err(CoreError::Dataplane)?;

        tracing::info!(acl_index = reply.acl_index, name, "ACL created");
        Ok(reply.acl_index)
    }

    /// Replaces the rules of an existing ACL.
    pub async fn update(&self, id: u32, rules: &[AclRule]) -> Result<(), CoreError> {
        if rules.is_empty() {
            return Err(CoreError::InvalidInput {
                reason: "acl must contain at least one rule".into(),
            });
        }

        self.client
            .call::<_, AclAddReplaceReply>(AclAddReplace {
                acl_index: id,
                tag: String::new(),
                rules: convert::acl_rules_to_wire(rules),
            })
            .await
            .map_err(|err| map_remote(format!("ACL {id}"), err))?;

        tracing::info!(acl_index = id, "ACL updated");
        Ok(())
    }

    pub async fn delete(&self, id: u32) -> Result<(), CoreError> {
        self.client
            .call::<_, AclDelReply>(AclDel { acl_index: id })
            .await
            .map_err(|err| map_remote(format!("ACL {id}"), err))?;
        tracing::info!(acl_index = id, "ACL deleted");
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<AclInfo>, CoreError> {
        let acls = self
            .client
            .dump(AclDump::default(), |msg| {
                let details = msg.into_any().downcast::<AclDetails>().ok()?;
                Some(AclInfo {
                    id: details.acl_index,
                    name: details.tag,
                    rules: convert::acl_rules_from_wire(&details.rules),
                })
            })
            .await?;
        Ok(acls)
    }
}
