//! The Cyphers endpoint catalog.
//!
//! Pure data: every gateway operation is one [`EndpointSpec`] mirroring the
//! corresponding upstream resource.  The generic validator and URL builder
//! in `cygate-core` do the rest, so adding an upstream resource means adding
//! a row here and a route in the server.
//!
//! Related image bases (not proxied, documented by the upstream):
//! - items: `https://img-api.neople.co.kr/cy/items/<itemId>`
//! - characters: `https://img-api.neople.co.kr/cy/characters/<characterId>`
//! - position attributes: `https://img-api.neople.co.kr/cy/position-attributes/<attributeId>`

use cygate_core::{EndpointSpec, ParameterSpec};

/// All endpoints served by the gateway, in registration order.
pub fn catalog() -> Vec<EndpointSpec> {
    vec![
        EndpointSpec::new("players", "players")
            .with_param(ParameterSpec::query("nickname").required())
            .with_param(
                ParameterSpec::query("wordType")
                    .one_of(&["match", "full"])
                    .default_str("match"),
            )
            .with_param(ParameterSpec::query("limit").int().range(1, 200).default_int(10)),
        EndpointSpec::new("player", "players/{playerId}")
            .with_param(ParameterSpec::path("playerId")),
        EndpointSpec::new("player-matches", "players/{playerId}/matches")
            .with_param(ParameterSpec::path("playerId"))
            .with_param(
                ParameterSpec::query("gameTypeId")
                    .one_of(&["rating", "normal"])
                    .default_str("rating"),
            )
            .with_param(ParameterSpec::query("startDate").date())
            .with_param(ParameterSpec::query("endDate").date())
            .with_param(ParameterSpec::query("limit").int().range(1, 100).default_int(10))
            // Pagination cursor; when set, the upstream applies the other
            // parameters as of the first page.
            .with_param(ParameterSpec::query("next"))
            .with_date_range_pair("startDate", "endDate"),
        EndpointSpec::new("match", "matches/{matchId}")
            .with_param(ParameterSpec::path("matchId")),
        EndpointSpec::new("rating-ranking", "ranking/ratingpoint")
            .with_param(ParameterSpec::query("playerId").required())
            .with_param(ParameterSpec::query("offset").int().default_int(0))
            .with_param(ParameterSpec::query("limit").int().range(1, 1000).default_int(10)),
        EndpointSpec::new("character-ranking", "ranking/characters/{characterId}/{rankingType}")
            .with_param(ParameterSpec::path("characterId"))
            .with_param(ParameterSpec::path("rankingType").one_of(&[
                "winCount",
                "winRate",
                "killCount",
                "assistCount",
                "exp",
            ]))
            .with_param(ParameterSpec::query("playerId"))
            .with_param(ParameterSpec::query("offset").int().default_int(0))
            .with_param(ParameterSpec::query("limit").int().range(1, 1000).default_int(10)),
        EndpointSpec::new("tsj-ranking", "ranking/tsj/{tsjType}")
            .with_param(ParameterSpec::path("tsjType").one_of(&["melee", "ranged"]))
            .with_param(ParameterSpec::query("playerId"))
            .with_param(ParameterSpec::query("offset").int().default_int(0))
            .with_param(ParameterSpec::query("limit").int().range(1, 1000).default_int(10)),
        EndpointSpec::new("battleitems", "battleitems")
            .with_param(ParameterSpec::query("limit").int().range(1, 1000).default_int(10))
            .with_param(ParameterSpec::query("itemName").required())
            .with_param(
                ParameterSpec::query("wordType")
                    .one_of(&["match", "front", "full"])
                    .default_str("match"),
            )
            .with_param(ParameterSpec::query("q").list().repeated_key()),
        EndpointSpec::new("battleitem", "battleitems/{itemId}")
            .with_param(ParameterSpec::path("itemId")),
        // The upstream resolves at most 30 items per multi lookup.
        EndpointSpec::new("multi-battleitems", "multi/battleitems")
            .with_param(ParameterSpec::query("itemIds").list().max_items(30).required()),
        EndpointSpec::new("characters", "characters"),
        EndpointSpec::new("position-attributes", "position-attributes/{attributeId}")
            .with_param(ParameterSpec::path("attributeId")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_entry_is_structurally_valid() {
        for spec in catalog() {
            spec.validate().unwrap_or_else(|e| panic!("{e}"));
        }
    }

    #[test]
    fn catalog_covers_all_twelve_operations() {
        let names: Vec<&str> = catalog().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "players",
                "player",
                "player-matches",
                "match",
                "rating-ranking",
                "character-ranking",
                "tsj-ranking",
                "battleitems",
                "battleitem",
                "multi-battleitems",
                "characters",
                "position-attributes",
            ]
        );
    }

    #[test]
    fn endpoint_names_are_unique() {
        let mut names: Vec<&str> = catalog().iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), catalog().len());
    }
}
