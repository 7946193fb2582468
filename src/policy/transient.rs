use crate::policy::client::Client;
use crate::policy::util::BuildIdHasher;
use crate::winsys::window::Window;

use std::collections::HashMap;

pub type ClientMap = HashMap<Window, Client, BuildIdHasher>;

/// Lookup of window records by client handle. A handle without a record is
/// treated exactly like an absent relation.
pub trait Clients {
    fn client(
        &self,
        window: Window,
    ) -> Option<&Client>;

    fn len(&self) -> usize;
}

impl Clients for ClientMap {
    #[inline]
    fn client(
        &self,
        window: Window,
    ) -> Option<&Client> {
        self.get(&window)
    }

    #[inline]
    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

/// Whether `ancestor` is reachable from `transient` by following
/// transient-for links.
pub fn is_ancestor_to(
    clients: &impl Clients,
    transient: &Client,
    ancestor: &Client,
) -> bool {
    let mut current = transient.transient_for();

    // a chain longer than the record count must loop
    for _ in 0..=clients.len() {
        match current {
            Some(window) if window == ancestor.window() => return true,
            Some(window) => match clients.client(window) {
                Some(client) => current = client.transient_for(),
                None => return false,
            },
            None => return false,
        }
    }

    error!("transient-for cycle through window {:#0x}", transient.window());
    debug_assert!(false, "transient-for cycle");
    false
}

/// Validate a transient-for hint read for `client`. Self references, unknown
/// targets and targets that are themselves transients of `client` are
/// dropped, which keeps every transient chain acyclic.
pub fn validate_transient_for(
    clients: &impl Clients,
    client: &Client,
    hint: Option<Window>,
) -> Option<Window> {
    let target = clients.client(hint?)?;

    if target.window() == client.window() {
        debug!("window {:#0x} declares itself transient", client.window());
        return None;
    }

    if is_ancestor_to(clients, target, client) {
        debug!(
            "rejecting transient-for {:#0x} of window {:#0x}: cycle",
            target.window(),
            client.window()
        );
        return None;
    }

    Some(target.window())
}

/// The client leader of `client`, falling back to that of its nearest
/// ancestor declaring one.
pub fn resolve_client_leader(
    clients: &impl Clients,
    client: &Client,
    declared: Option<Window>,
) -> Option<Window> {
    if declared.is_some() {
        return declared;
    }

    let mut current = client.transient_for();

    for _ in 0..=clients.len() {
        let ancestor = clients.client(current?)?;

        if let Some(leader) = ancestor.client_leader() {
            return Some(leader);
        }

        current = ancestor.transient_for();
    }

    None
}

/// Whether `a` and `b` belong to the same application instance.
pub fn same_leader(
    a: &Client,
    b: &Client,
) -> bool {
    match (a.client_leader(), b.client_leader()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::winsys::connection::WindowAttributes;
    use crate::winsys::window::WindowType;

    pub(crate) fn managed_client(
        window: Window,
        wm_type: WindowType,
    ) -> Client {
        let client = Client::new(window, WindowAttributes {
            override_redirect: false,
            viewable: false,
            input_only: false,
            ..Default::default()
        });

        client.set_wm_type(wm_type);
        client.recalc_type();
        client
    }

    fn chain() -> ClientMap {
        let mut clients = ClientMap::default();

        clients.insert(0x10, managed_client(0x10, WindowType::Normal));
        clients.insert(0x20, managed_client(0x20, WindowType::Dialog));
        clients.insert(0x30, managed_client(0x30, WindowType::Dialog));
        clients[&0x20].set_transient_for(Some(0x10));
        clients[&0x30].set_transient_for(Some(0x20));
        clients
    }

    #[test]
    fn ancestry_follows_transient_chain() {
        let clients = chain();

        assert!(is_ancestor_to(&clients, &clients[&0x30], &clients[&0x10]));
        assert!(is_ancestor_to(&clients, &clients[&0x30], &clients[&0x20]));
        assert!(!is_ancestor_to(&clients, &clients[&0x10], &clients[&0x30]));
        assert!(!is_ancestor_to(&clients, &clients[&0x10], &clients[&0x10]));
    }

    #[test]
    fn dangling_reference_is_no_relation() {
        let mut clients = chain();
        clients.remove(&0x20);

        assert!(!is_ancestor_to(&clients, &clients[&0x30], &clients[&0x10]));
    }

    #[test]
    fn cyclic_hints_are_rejected() {
        let clients = chain();
        let root = &clients[&0x10];

        assert_eq!(validate_transient_for(&clients, root, Some(0x30)), None);
        assert_eq!(validate_transient_for(&clients, root, Some(0x10)), None);
        assert_eq!(validate_transient_for(&clients, root, Some(0x999)), None);
        assert_eq!(validate_transient_for(&clients, root, None), None);
        assert_eq!(validate_transient_for(&clients, &clients[&0x30], Some(0x10)), Some(0x10));
    }

    #[test]
    fn leader_is_inherited_from_ancestor() {
        let clients = chain();
        clients[&0x10].set_client_leader(Some(0x10));

        assert_eq!(resolve_client_leader(&clients, &clients[&0x30], None), Some(0x10));
        assert_eq!(resolve_client_leader(&clients, &clients[&0x30], Some(0x77)), Some(0x77));
        assert_eq!(resolve_client_leader(&clients, &clients[&0x10], None), None);
    }

    #[test]
    fn absent_leaders_never_match() {
        let clients = chain();

        assert!(!same_leader(&clients[&0x10], &clients[&0x20]));

        clients[&0x10].set_client_leader(Some(0x5));
        clients[&0x20].set_client_leader(Some(0x5));
        assert!(same_leader(&clients[&0x10], &clients[&0x20]));
    }
}
