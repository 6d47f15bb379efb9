//! IP routing and VRF service.
//!
//! VRF creation and deletion are two-phase at the dataplane level: one
//! logical VRF id owns separate IPv4 and IPv6 table objects. Creation rolls
//! back phase 1 when phase 2 fails; deletion attempts both phases and
//! reports every failed family together.

use crate::convert;
use crate::domain::{Destination, Route, Vrf};
use crate::error::{map_remote, CoreError};
use crate::vrf_cache::VrfCache;
use dpctl_client::{Client, ClientError};
use dpctl_wire::ip::{
    IpRoute, IpRouteAddDel, IpRouteAddDelReply, IpRouteDetails, IpRouteDump, IpRouteLookup,
    IpRouteLookupReply, IpTable, IpTableAddDel, IpTableAddDelReply, IpTableDetails, IpTableDump,
    Prefix, ANY_TABLE,
};
use std::collections::{BTreeMap, HashMap};
use std::net::{IpAddr, Ipv6Addr};

/// Reserved IPv6 prefixes whose routes are system-installed: link-local,
/// multicast, loopback, discard-only.
const SYSTEM_PREFIXES_V6: [(Ipv6Addr, u8); 4] = [
    (Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 0), 10),
    (Ipv6Addr::new(0xff00, 0, 0, 0, 0, 0, 0, 0), 8),
    (Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1), 128),
    (Ipv6Addr::new(0x0100, 0, 0, 0, 0, 0, 0, 0), 64),
];

/// True when the route is administratively installed rather than
/// operator-installed: any drop/local/receive path, or an IPv6 destination
/// inside a reserved prefix.
pub fn is_system_route(route: &IpRoute) -> bool {
    use dpctl_wire::ip::FibPathType;

    if route.paths.iter().any(|path| {
        matches!(
            path.path_type,
            FibPathType::Drop | FibPathType::Local | FibPathType::Receive
        )
    }) {
        return true;
    }

    is_ipv6_system_destination(&route.prefix)
}

fn is_ipv6_system_destination(prefix: &Prefix) -> bool {
    let IpAddr::V6(addr) = prefix.address else {
        return false;
    };

    SYSTEM_PREFIXES_V6.iter().any(|(net, len)| {
        prefix.len >= *len && v6_in_prefix(addr, *net, *len)
    })
}

fn v6_in_prefix(addr: Ipv6Addr, net: Ipv6Addr, len: u8) -> bool {
    if len == 0 {
        return true;
    }
    let addr = u128::from_be_bytes(addr.octets());
    let net = u128::from_be_bytes(net.octets());
    (addr ^ net) >> (128 - len as u32) == 0
}

/// Routing and VRF operations, backed by the correlation engine and the
/// VRF cache.
pub struct IpService {
    client: Client,
    cache: VrfCache,
}

impl IpService {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            cache: VrfCache::new(),
        }
    }

    pub fn cache(&self) -> &VrfCache {
        &self.cache
    }

    /// Reconciles the cache from a full dataplane table dump. Run once at
    /// process start; entries created concurrently are preserved.
    pub async fn warm_cache(&self) -> Result<(), CoreError> {
        let tables = self
            .client
            .dump(IpTableDump {}, |msg| {
                msg.into_any()
                    .downcast::<IpTableDetails>()
                    .ok()
                    .map(|details| (details.table.table_id, details.table.name))
            })
            .await?;

        self.cache.reconcile(tables);
        tracing::info!(entries = self.cache.len(), "VRF cache warmed");
        Ok(())
    }

    pub async fn add_route(&self, route: &Route) -> Result<(), CoreError> {
        let req = self.route_request(route, true)?;
        self.client
            .call::<_, IpRouteAddDelReply>(req)
            .await
            .map_err(|err| map_remote(format!("route {}", route.dst), err))?;
        tracing::info!(dst = %route.dst, vrf = route.vrf, "route added");
        Ok(())
    }

    pub async fn delete_route(&self, route: &Route) -> Result<(), CoreError> {
        let req = self.route_request(route, false)?;
        self.client
            .call::<_, IpRouteAddDelReply>(req)
            .await
            .map_err(|err| map_remote(format!("route {}", route.dst), err))?;
        tracing::info!(dst = %route.dst, vrf = route.vrf, "route deleted");
        Ok(())
    }

    fn route_request(&self, route: &Route, is_add: bool) -> Result<IpRouteAddDel, CoreError> {
        let paths = convert::fib_paths_from_next_hops(&route.next_hops)?;
        Ok(IpRouteAddDel {
            is_add,
            is_multipath: paths.len() > 1,
            route: IpRoute {
                table_id: route.vrf,
                prefix: convert::prefix_from_destination(&route.dst),
                paths,
            },
        })
    }

    pub async fn get_route(&self, dst: Destination, vrf: u32) -> Result<Route, CoreError> {
        let reply: IpRouteLookupReply = self
            .client
            .call(IpRouteLookup {
                table_id: vrf,
                exact: true,
                prefix: convert::prefix_from_destination(&dst),
            })
            .await
            .map_err(|err| map_remote(format!("route {dst}"), err))?;

        Ok(convert::route_from_wire(&reply.route)?)
    }

    /// Routes of one VRF, both address families, in receive order.
    pub async fn list_routes(&self, vrf: u32) -> Result<Vec<Route>, CoreError> {
        let mut routes = self.dump_routes(vrf, false).await?;
        routes.extend(self.dump_routes(vrf, true).await?);
        Ok(routes)
    }

    async fn dump_routes(&self, table_id: u32, is_ip6: bool) -> Result<Vec<Route>, CoreError> {
        let routes = self
            .client
            .dump(
                IpRouteDump {
                    table: IpTable {
                        table_id,
                        is_ip6,
                        name: String::new(),
                    },
                },
                |msg| {
                    let details = msg.into_any().downcast::<IpRouteDetails>().ok()?;
                    match convert::route_from_wire(&details.route) {
                        Ok(route) => Some(route),
                        Err(err) => {
                            tracing::warn!(%err, "skipping unconvertible route");
                            None
                        }
                    }
                },
            )
            .await?;
        Ok(routes)
    }

    /// Creates both table objects for a VRF id. If the IPv6 phase fails the
    /// IPv4 table is torn down again before the error surfaces, and the
    /// cache is left untouched.
    pub async fn create_vrf(&self, id: u32, name: &str) -> Result<(), CoreError> {
        self.client
            .call::<_, IpTableAddDelReply>(table_add_del(id, name, false, true))
            .await
            .map_err(|err| map_remote(format!("VRF {id} (IPv4)"), err))?;

        if let Err(err) = self
            .client
            .call::<_, IpTableAddDelReply>(table_add_del(id, name, true, true))
            .await
        {
            // Compensating delete for phase 1.
            if let Err(rollback_err) = self.delete_table(id, name, false).await {
                tracing::error!(id, %rollback_err, "IPv4 table rollback failed");
            }
            return Err(map_remote(format!("VRF {id} (IPv6)"), err));
        }

        self.cache.upsert(id, name);
        tracing::info!(id, name, "VRF created");
        Ok(())
    }

    /// Deletes both table objects. Both phases are attempted even if the
    /// first fails; the cache entry is removed once deletion was attempted,
    /// regardless of phase outcomes, so a half-deleted VRF is no longer
    /// advertised.
    pub async fn delete_vrf(&self, id: u32) -> Result<(), CoreError> {
        let entry = self.cache.get(id)?;

        let mut errors: Vec<(&'static str, ClientError)> = Vec::new();
        if let Err(err) = self.delete_table(id, &entry.name, false).await {
            errors.push(("IPv4", err));
        }
        if let Err(err) = self.delete_table(id, &entry.name, true).await {
            errors.push(("IPv6", err));
        }

        self.cache.remove(id);

        if !errors.is_empty() {
            return Err(CoreError::TwoPhase {
                op: "delete",
                id,
                errors,
            });
        }
        tracing::info!(id, "VRF deleted");
        Ok(())
    }

    async fn delete_table(&self, id: u32, name: &str, is_ip6: bool) -> Result<(), ClientError> {
        self.client
            .call::<_, IpTableAddDelReply>(table_add_del(id, name, is_ip6, false))
            .await
            .map(|_| ())
    }

    /// The merged VRF view: live route statistics joined with cached
    /// metadata, ascending by id.
    ///
    /// The route dumps run outside the cache lock; the result is a
    /// best-effort snapshot with respect to concurrent mutations.
    pub async fn list_vrfs(&self) -> Result<Vec<Vrf>, CoreError> {
        let mut map: BTreeMap<u32, Vrf> = BTreeMap::new();

        self.collect_route_stats(&mut map, false).await?;
        self.collect_route_stats(&mut map, true).await?;

        let cached: HashMap<u32, String> = self
            .cache
            .snapshot()
            .into_iter()
            .map(|(id, entry)| (id, entry.name))
            .collect();

        // Cached VRFs appear even with zero routes.
        for id in cached.keys() {
            map.entry(*id).or_insert_with(|| Vrf {
                id: *id,
                ..Default::default()
            });
        }

        // Names attach to every id present, including route-only ids.
        for vrf in map.values_mut() {
            if let Some(name) = cached.get(&vrf.id) {
                vrf.name = name.clone();
            }
        }

        Ok(map.into_values().collect())
    }

    async fn collect_route_stats(
        &self,
        map: &mut BTreeMap<u32, Vrf>,
        is_ip6: bool,
    ) -> Result<(), CoreError> {
        let table_ids = self
            .client
            .dump(
                IpRouteDump {
                    table: IpTable {
                        table_id: ANY_TABLE,
                        is_ip6,
                        name: String::new(),
                    },
                },
                |msg| {
                    let details = msg.into_any().downcast::<IpRouteDetails>().ok()?;
                    if is_system_route(&details.route) {
                        return None;
                    }
                    Some(details.route.table_id)
                },
            )
            .await?;

        for table_id in table_ids {
            let vrf = map.entry(table_id).or_insert_with(|| Vrf {
                id: table_id,
                ..Default::default()
            });
            if is_ip6 {
                vrf.ipv6 = true;
            } else {
                vrf.ipv4 = true;
            }
            vrf.route_count += 1;
        }

        Ok(())
    }
}

fn table_add_del(id: u32, name: &str, is_ip6: bool, is_add: bool) -> IpTableAddDel {
    IpTableAddDel {
        is_add,
        table: IpTable {
            table_id: id,
            is_ip6,
            name: name.to_string(),
        },
    }
}
