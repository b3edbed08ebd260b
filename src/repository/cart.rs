use diesel::prelude::*;

use crate::domain::cart::Cart as DomainCart;
use crate::models::cart::{Cart as DbCart, CartItem as DbCartItem};
use crate::repository::{CartReader, DieselRepository, RepositoryResult};

impl CartReader for DieselRepository {
    fn get_cart_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCart>> {
        use crate::schema::{cart_items, carts};

        let mut conn = self.conn()?;
        let cart = carts::table
            .filter(carts::id.eq(id))
            .first::<DbCart>(&mut conn)
            .optional()?;

        let Some(cart) = cart else {
            return Ok(None);
        };

        let items = cart_items::table
            .filter(cart_items::cart_id.eq(cart.id))
            .order(cart_items::id.asc())
            .load::<DbCartItem>(&mut conn)?;

        Ok(Some(cart.into_domain(items)))
    }
}
