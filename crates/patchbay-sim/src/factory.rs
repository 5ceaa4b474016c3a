//! Fabrication of connection records and cross-connect holders.

use std::sync::Arc;

use patchbay_proto::fixtures;
use patchbay_proto::{Connection, CrossConnect, Endpoint, MechanismKind, RemoteConnection};
use rand::Rng;

use crate::buffer::CrossConnectHolder;

/// Identifier role suffix of a connection record within its cross-connect.
#[derive(Debug, Clone, Copy)]
enum EndpointRole {
    /// Local source record.
    Source,
    /// Local destination record, or the shared remote record of a pair.
    Destination,
    /// Local destination record on the receiver half of a pair.
    ReceiverDestination,
}

impl EndpointRole {
    fn suffix(self) -> char {
        match self {
            Self::Source => '0',
            Self::Destination => '1',
            Self::ReceiverDestination => '2',
        }
    }
}

/// Builds cross-connect holders with globally unique identifiers.
///
/// Identifier stems come from a counter that advances by one per local
/// holder and by two per remote pair (sender stem first). Stems render as
/// fixed-width hex, so a stem can never collide with another record's
/// suffixed id.
#[derive(Debug, Default)]
pub(crate) struct ConnectionFactory {
    next_id: u64,
}

impl ConnectionFactory {
    /// Fabricates a standalone local cross-connect.
    pub(crate) fn create_local<R: Rng>(&mut self, rng: &mut R) -> CrossConnectHolder {
        let stem = self.take_stem();
        let source = connection_record(rng, stem, EndpointRole::Source);
        let destination = connection_record(rng, stem, EndpointRole::Destination);

        CrossConnectHolder::Local(CrossConnect {
            id: format_stem(stem),
            payload: fixtures::PAYLOAD.to_owned(),
            source: Endpoint::Local(source),
            destination: Endpoint::Local(destination),
        })
    }

    /// Fabricates a linked sender/receiver pair around one shared remote
    /// record.
    ///
    /// The remote record takes the sender's stem with the destination
    /// suffix; the receiver claims the following stem.
    pub(crate) fn create_remote_pair<R: Rng>(&mut self, rng: &mut R) -> CrossConnectHolder {
        let sender_stem = self.take_stem();
        let receiver_stem = self.take_stem();

        let remote = Arc::new(remote_connection_record(rng, sender_stem));
        let sender_source = connection_record(rng, sender_stem, EndpointRole::Source);
        let receiver_destination =
            connection_record(rng, receiver_stem, EndpointRole::ReceiverDestination);

        let sender = CrossConnect {
            id: format_stem(sender_stem),
            payload: fixtures::PAYLOAD.to_owned(),
            source: Endpoint::Local(sender_source),
            destination: Endpoint::Remote(Arc::clone(&remote)),
        };
        let receiver = CrossConnect {
            id: format_stem(receiver_stem),
            payload: fixtures::PAYLOAD.to_owned(),
            source: Endpoint::Remote(remote),
            destination: Endpoint::Local(receiver_destination),
        };
        CrossConnectHolder::RemotePair { sender, receiver }
    }

    fn take_stem(&mut self) -> u64 {
        let stem = self.next_id;
        self.next_id += 1;
        stem
    }
}

fn format_stem(stem: u64) -> String {
    format!("{stem:08x}")
}

fn connection_record<R: Rng>(rng: &mut R, stem: u64, role: EndpointRole) -> Connection {
    Connection {
        id: format!("{stem:08x}{}", role.suffix()),
        service_name: random_service_name(rng),
        mechanism: random_mechanism(rng),
        parameters: fixtures::parameters(),
        context: fixtures::context(),
        labels: fixtures::labels(),
    }
}

fn remote_connection_record<R: Rng>(rng: &mut R, stem: u64) -> RemoteConnection {
    RemoteConnection {
        id: format!("{stem:08x}{}", EndpointRole::Destination.suffix()),
        service_name: random_service_name(rng),
        mechanism: random_mechanism(rng),
        parameters: fixtures::parameters(),
        context: fixtures::context(),
        labels: fixtures::labels(),
        source_manager: fixtures::SOURCE_MANAGER.to_owned(),
        destination_manager: fixtures::DESTINATION_MANAGER.to_owned(),
    }
}

fn random_service_name<R: Rng>(rng: &mut R) -> String {
    format!("{:x}", rng.gen_range(0..fixtures::SERVICE_NAME_SPACE))
}

/// Uniform draw over the mechanism set.
pub(crate) fn random_mechanism<R: Rng>(rng: &mut R) -> MechanismKind {
    MechanismKind::ALL[rng.gen_range(0..MechanismKind::ALL.len())]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn local_holder_ids_follow_the_role_scheme() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut factory = ConnectionFactory::default();

        let CrossConnectHolder::Local(cross_connect) = factory.create_local(&mut rng) else {
            panic!("expected a local holder");
        };
        assert_eq!(cross_connect.id, "00000000");
        assert_eq!(cross_connect.source.id(), "000000000");
        assert_eq!(cross_connect.destination.id(), "000000001");
        assert!(cross_connect.is_local());
    }

    #[test]
    fn remote_pair_shares_one_record() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut factory = ConnectionFactory::default();

        let CrossConnectHolder::RemotePair { sender, receiver } =
            factory.create_remote_pair(&mut rng)
        else {
            panic!("expected a remote pair");
        };
        assert_eq!(sender.id, "00000000");
        assert_eq!(receiver.id, "00000001");
        assert_eq!(sender.source.id(), "000000000");
        assert_eq!(sender.destination.id(), "000000001");
        assert_eq!(receiver.source.id(), "000000001");
        assert_eq!(receiver.destination.id(), "000000012");

        let (Endpoint::Remote(sender_leg), Endpoint::Remote(receiver_leg)) =
            (&sender.destination, &receiver.source)
        else {
            panic!("expected remote legs");
        };
        assert!(Arc::ptr_eq(sender_leg, receiver_leg));
        assert_eq!(sender_leg.source_manager, fixtures::SOURCE_MANAGER);
        assert_eq!(sender_leg.destination_manager, fixtures::DESTINATION_MANAGER);
    }

    #[test]
    fn counter_advances_per_holder_width() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut factory = ConnectionFactory::default();

        factory.create_local(&mut rng);
        factory.create_remote_pair(&mut rng);
        let CrossConnectHolder::Local(cross_connect) = factory.create_local(&mut rng) else {
            panic!("expected a local holder");
        };
        assert_eq!(cross_connect.id, "00000003");
    }

    #[test]
    fn records_vary_only_in_the_drawn_fields() {
        let mut first_rng = ChaCha8Rng::seed_from_u64(2);
        let mut second_rng = ChaCha8Rng::seed_from_u64(99);

        let first = connection_record(&mut first_rng, 5, EndpointRole::Source);
        let second = connection_record(&mut second_rng, 5, EndpointRole::Source);
        assert_eq!(first.id, second.id);
        assert_eq!(first.parameters, second.parameters);
        assert_eq!(first.context, second.context);
        assert_eq!(first.labels, second.labels);
    }

    #[test]
    fn service_names_stay_in_the_hex_space() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..64 {
            let name = random_service_name(&mut rng);
            let value = u32::from_str_radix(&name, 16).unwrap();
            assert!(value < fixtures::SERVICE_NAME_SPACE);
        }
    }
}
