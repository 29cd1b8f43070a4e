//! Named collection of maps with random selection.

use super::definition::MapDefinition;
use crate::error::{Error, Result};
use rand::Rng;
use std::path::Path;
use std::sync::Arc;

/// Named maps an environment chooses from at every reset.
///
/// Maps are kept in name order so that a seeded choice is reproducible.
#[derive(Clone, Debug)]
pub struct MapDefinitionPool {
    maps: Vec<(String, Arc<MapDefinition>)>,
}

impl MapDefinitionPool {
    /// Build a pool from named maps.
    ///
    /// An empty pool or a duplicate name is rejected.
    pub fn new<I, S>(maps: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, MapDefinition)>,
        S: Into<String>,
    {
        let mut maps: Vec<(String, Arc<MapDefinition>)> = maps
            .into_iter()
            .map(|(name, map)| (name.into(), Arc::new(map)))
            .collect();
        if maps.is_empty() {
            return Err(Error::Config("map pool is empty".to_string()));
        }
        maps.sort_by(|a, b| a.0.cmp(&b.0));
        if let Some(dup) = maps.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(Error::Config(format!("duplicate map name '{}'", dup[0].0)));
        }
        Ok(Self { maps })
    }

    /// Pool with a single map named `default`
    pub fn single(map: MapDefinition) -> Self {
        Self {
            maps: vec![("default".to_string(), Arc::new(map))],
        }
    }

    /// Load every `.yaml` / `.yml` file in a directory, named by file stem.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut maps = Vec::new();
        for entry in std::fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            let is_yaml = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            );
            if !is_yaml {
                continue;
            }
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unnamed")
                .to_string();
            maps.push((name, MapDefinition::load(&path)?));
        }
        Self::new(maps)
    }

    /// Map by name
    pub fn get(&self, name: &str) -> Option<Arc<MapDefinition>> {
        self.maps
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
            .map(|i| Arc::clone(&self.maps[i].1))
    }

    /// Map names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.maps.iter().map(|(n, _)| n.as_str())
    }

    /// Number of maps
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Never true for a constructed pool
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Uniformly random map
    pub fn choose_random<R: Rng + ?Sized>(&self, rng: &mut R) -> (&str, Arc<MapDefinition>) {
        let (name, map) = &self.maps[rng.gen_range(0..self.maps.len())];
        (name.as_str(), Arc::clone(map))
    }

    /// Largest target distance over all maps
    pub fn max_target_dist(&self) -> f32 {
        self.maps
            .iter()
            .map(|(_, m)| m.max_target_dist())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::io::Write;

    fn map_yaml(width: f32) -> String {
        format!(
            "width: {}\nheight: 10.0\nrobot_spawn_zones:\n  - [[2.0, 1.0], [1.0, 1.0], [1.0, 2.0]]\nrobot_goal_zones:\n  - [[9.0, 8.0], [8.0, 8.0], [8.0, 9.0]]\n",
            width
        )
    }

    #[test]
    fn test_empty_pool_rejected() {
        let empty: Vec<(String, MapDefinition)> = Vec::new();
        assert!(MapDefinitionPool::new(empty).is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let map = MapDefinition::from_yaml(&map_yaml(10.0)).unwrap();
        assert!(MapDefinitionPool::new([("a", map.clone()), ("a", map)]).is_err());
    }

    #[test]
    fn test_choose_random_covers_all_maps() {
        let pool = MapDefinitionPool::new([
            ("a", MapDefinition::from_yaml(&map_yaml(10.0)).unwrap()),
            ("b", MapDefinition::from_yaml(&map_yaml(30.0)).unwrap()),
        ])
        .unwrap();

        let mut rng = SmallRng::seed_from_u64(1);
        let mut seen_a = false;
        let mut seen_b = false;
        for _ in 0..100 {
            match pool.choose_random(&mut rng).0 {
                "a" => seen_a = true,
                "b" => seen_b = true,
                other => panic!("unknown map {}", other),
            }
        }
        assert!(seen_a && seen_b);
        assert_eq!(pool.get("b").unwrap().width(), 30.0);
        assert!(pool.get("c").is_none());
        assert!(pool.max_target_dist() > 30.0);
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        for (name, width) in [("small", 10.0), ("large", 40.0)] {
            let mut f = std::fs::File::create(dir.path().join(format!("{}.yaml", name))).unwrap();
            f.write_all(map_yaml(width).as_bytes()).unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), "not a map").unwrap();

        let pool = MapDefinitionPool::load_dir(dir.path()).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.names().collect::<Vec<_>>(), vec!["large", "small"]);
    }
}
