use diesel::prelude::*;

use crate::domain::category::Category as DomainCategory;
use crate::domain::product::Product as DomainProduct;
use crate::domain::variant::Variant as DomainVariant;
use crate::models::category::Category as DbCategory;
use crate::models::product::Product as DbProduct;
use crate::models::variant::Variant as DbVariant;
use crate::repository::{
    CategoryReader, DieselRepository, ProductReader, RepositoryResult, VariantReader,
};

impl VariantReader for DieselRepository {
    fn get_variant_by_id(&self, id: i32) -> RepositoryResult<Option<DomainVariant>> {
        use crate::schema::variants;

        let mut conn = self.conn()?;
        let variant = variants::table
            .filter(variants::id.eq(id))
            .first::<DbVariant>(&mut conn)
            .optional()?;

        Ok(variant.map(Into::into))
    }
}

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Into::into))
    }
}

impl CategoryReader for DieselRepository {
    fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let category = categories::table
            .filter(categories::id.eq(id))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(Into::into))
    }
}
