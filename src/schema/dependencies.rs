use super::tables::{get_table, ALL_TABLES};
use super::types::TableSchema;
use std::collections::{HashMap, HashSet};

/// Orders tables by their foreign key dependencies
pub struct DependencyResolver {
    /// Map of table name -> tables it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        let deps = ALL_TABLES
            .iter()
            .map(|table| (table.name, table.dependencies()))
            .collect();

        Self { deps }
    }

    /// Return all tables in dependency order (parents before children)
    pub fn all_tables_ordered(&self) -> Result<Vec<&'static TableSchema>, String> {
        let names: Vec<&str> = ALL_TABLES.iter().map(|t| t.name).collect();
        self.topological_sort(&names)
    }

    /// Return all tables children-first, the order tables must be dropped in
    pub fn drop_order(&self) -> Result<Vec<&'static TableSchema>, String> {
        let mut tables = self.all_tables_ordered()?;
        tables.reverse();
        Ok(tables)
    }

    /// Topological sort of tables by dependencies. Visits `included` in the
    /// given order so the result is stable between runs.
    fn topological_sort(&self, included: &[&str]) -> Result<Vec<&'static TableSchema>, String> {
        let included_set: HashSet<&str> = included.iter().copied().collect();
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut temp_visited: HashSet<&str> = HashSet::new();

        for &table_name in included {
            if !visited.contains(table_name) {
                self.visit(
                    table_name,
                    &included_set,
                    &mut visited,
                    &mut temp_visited,
                    &mut result,
                )?;
            }
        }

        Ok(result)
    }

    fn visit<'a>(
        &self,
        name: &'a str,
        included: &HashSet<&'a str>,
        visited: &mut HashSet<&'a str>,
        temp_visited: &mut HashSet<&'a str>,
        result: &mut Vec<&'static TableSchema>,
    ) -> Result<(), String> {
        if temp_visited.contains(name) {
            return Err(format!("Circular dependency detected at: {}", name));
        }
        if visited.contains(name) {
            return Ok(());
        }

        temp_visited.insert(name);

        if let Some(deps) = self.deps.get(name) {
            // Sorted so sibling parents come out in a fixed order
            let mut deps: Vec<&str> = deps.iter().copied().collect();
            deps.sort_unstable();
            for dep in deps {
                if dep != name && included.contains(dep) {
                    self.visit(dep, included, visited, temp_visited, result)?;
                }
            }
        }

        temp_visited.remove(name);
        visited.insert(name);

        match get_table(name) {
            Some(table) => result.push(table),
            None => return Err(format!("Unknown table: {}", name)),
        }

        Ok(())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}
