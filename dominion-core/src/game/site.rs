use super::{Game, ModifierOwner};
use crate::database::ResourceId;
use crate::scope::{ProvinceId, SiteId};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Site {
    identifier: String,
    pub(crate) province: ProvinceId,
    pub(crate) resource: Option<ResourceId>,
    pub(crate) output_modifier: i64,
}

impl Site {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn province(&self) -> ProvinceId {
        self.province
    }

    pub fn resource(&self) -> Option<ResourceId> {
        self.resource
    }

    pub fn output_modifier(&self) -> i64 {
        self.output_modifier
    }
}

impl Game {
    pub fn add_site(&mut self, identifier: &str, province: ProvinceId) -> SiteId {
        let id = SiteId(self.sites.len() as u32);
        self.sites.push(Site {
            identifier: identifier.to_string(),
            province,
            resource: None,
            output_modifier: 0,
        });
        self.province_mut(province).sites.push(id);
        id
    }

    pub fn set_site_resource(&mut self, site: SiteId, resource: Option<ResourceId>) {
        let old = self.site(site).resource;
        if old == resource {
            return;
        }
        let db = self.shared_database();
        if let Some(old) = old {
            let modifier = db.resources.get(old).site_modifier();
            self.deactivate_modifier(ModifierOwner::Resource(old), site, modifier);
        }
        self.site_mut(site).resource = resource;
        if let Some(new) = resource {
            let modifier = db.resources.get(new).site_modifier();
            self.activate_modifier(ModifierOwner::Resource(new), site, modifier);
        }
    }

    pub(crate) fn change_site_output_modifier(&mut self, site: SiteId, change: i64) {
        self.site_mut(site).output_modifier += change;
    }
}
